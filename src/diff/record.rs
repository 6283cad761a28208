// Tue Jan 15 2026 - Alex

//! Field, method, base and layout deltas of one struct or class.

use crate::diff::ChangeDetail;
use crate::model::{Field, Method, MethodSignature, Record};
use crate::structure::{compare_vtables, LayoutResult, RecordLayout, VTableDifference};
use std::collections::{HashMap, HashSet};

pub fn compare_records(
    old: &Record,
    new: &Record,
    old_layout: Option<&LayoutResult>,
    new_layout: Option<&LayoutResult>,
) -> Vec<ChangeDetail> {
    let mut details = Vec::new();

    if old.base != new.base {
        details.push(ChangeDetail::BaseChanged {
            old: old.base.clone(),
            new: new.base.clone(),
        });
    }
    compare_fields(&old.fields, &new.fields, &mut details);
    compare_methods(&old.methods, &new.methods, &mut details);

    match (old_layout, new_layout) {
        (Some(Ok(old)), Some(Ok(new))) => compare_layouts(old, new, &mut details),
        (Some(Err(err)), Some(Ok(_))) | (Some(Ok(_)), Some(Err(err))) => {
            details.push(ChangeDetail::LayoutUnavailable {
                reason: err.to_string(),
            });
        }
        (Some(Err(err)), Some(Err(_))) if !details.is_empty() => {
            details.push(ChangeDetail::LayoutUnavailable {
                reason: err.to_string(),
            });
        }
        _ => {}
    }
    details
}

/// Names present in both lists, in the order `list` holds them.
fn common_order<'a>(list: &'a [String], other: &HashSet<&str>) -> Vec<&'a String> {
    list.iter().filter(|n| other.contains(n.as_str())).collect()
}

fn compare_fields(old: &[Field], new: &[Field], details: &mut Vec<ChangeDetail>) {
    let old_by_name: HashMap<&str, (usize, &Field)> =
        old.iter().enumerate().map(|(i, f)| (f.name.as_str(), (i, f))).collect();
    let new_names: HashSet<&str> = new.iter().map(|f| f.name.as_str()).collect();

    for (index, field) in old.iter().enumerate() {
        if !new_names.contains(field.name.as_str()) {
            details.push(ChangeDetail::FieldRemoved {
                name: field.name.clone(),
                ty: field.ty.clone(),
                index,
            });
        }
    }

    let last_common = new
        .iter()
        .rposition(|f| old_by_name.contains_key(f.name.as_str()));
    for (index, field) in new.iter().enumerate() {
        match old_by_name.get(field.name.as_str()) {
            None => details.push(ChangeDetail::FieldAdded {
                name: field.name.clone(),
                ty: field.ty.clone(),
                index,
                trailing: last_common.map(|last| index > last).unwrap_or(true),
            }),
            Some((_, previous)) if previous.ty != field.ty => details.push(ChangeDetail::FieldTypeChanged {
                name: field.name.clone(),
                old: previous.ty.clone(),
                new: field.ty.clone(),
            }),
            Some(_) => {}
        }
    }

    let old_names: Vec<String> = old.iter().map(|f| f.name.clone()).collect();
    let new_list: Vec<String> = new.iter().map(|f| f.name.clone()).collect();
    let old_set: HashSet<&str> = old_names.iter().map(String::as_str).collect();
    let old_common = common_order(&old_names, &new_names);
    let new_common = common_order(&new_list, &old_set);
    if old_common != new_common {
        details.push(ChangeDetail::FieldsReordered {
            old: old_common.into_iter().cloned().collect(),
            new: new_common.into_iter().cloned().collect(),
        });
    }
}

fn compare_methods(old: &[Method], new: &[Method], details: &mut Vec<ChangeDetail>) {
    let old_by_sig: HashMap<MethodSignature, &Method> = old.iter().map(|m| (m.signature(), m)).collect();
    let new_by_sig: HashMap<MethodSignature, &Method> = new.iter().map(|m| (m.signature(), m)).collect();

    let removed: Vec<&Method> = old.iter().filter(|m| !new_by_sig.contains_key(&m.signature())).collect();
    let added: Vec<&Method> = new.iter().filter(|m| !old_by_sig.contains_key(&m.signature())).collect();

    // a lone overload on each side with the same name is the same method re-signed
    let count = |list: &[&Method], name: &str| list.iter().filter(|m| m.name == name).count();
    let mut paired: HashSet<String> = HashSet::new();
    for method in &removed {
        if count(&removed, &method.name) == 1 && count(&added, &method.name) == 1 {
            paired.insert(method.name.clone());
        }
    }

    for method in &removed {
        if paired.contains(&method.name) {
            if let Some(replacement) = added.iter().find(|m| m.name == method.name) {
                details.push(ChangeDetail::MethodSignatureChanged {
                    old: method.signature(),
                    new: replacement.signature(),
                });
            }
        } else {
            details.push(ChangeDetail::MethodRemoved {
                signature: method.signature(),
                kind: method.kind,
            });
        }
    }
    for method in &added {
        if !paired.contains(&method.name) {
            details.push(ChangeDetail::MethodAdded {
                signature: method.signature(),
                kind: method.kind,
            });
        }
    }

    for method in new {
        let signature = method.signature();
        let Some(previous) = old_by_sig.get(&signature) else {
            continue;
        };
        if previous.ret != method.ret {
            details.push(ChangeDetail::MethodReturnChanged {
                signature: signature.clone(),
                old: previous.ret.clone(),
                new: method.ret.clone(),
            });
        }
        if previous.kind != method.kind {
            details.push(ChangeDetail::MethodKindChanged {
                signature,
                old: previous.kind,
                new: method.kind,
            });
        }
    }

    let old_list: Vec<String> = old.iter().map(|m| m.signature().to_string()).collect();
    let new_list: Vec<String> = new.iter().map(|m| m.signature().to_string()).collect();
    let old_set: HashSet<&str> = old_list.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new_list.iter().map(String::as_str).collect();
    let old_common = common_order(&old_list, &new_set);
    let new_common = common_order(&new_list, &old_set);
    if old_common != new_common {
        details.push(ChangeDetail::MethodsReordered {
            old: old_common.into_iter().cloned().collect(),
            new: new_common.into_iter().cloned().collect(),
        });
    }
}

fn compare_layouts(old: &RecordLayout, new: &RecordLayout, details: &mut Vec<ChangeDetail>) {
    if old.size != new.size {
        details.push(ChangeDetail::SizeChanged {
            old: old.size.as_u64(),
            new: new.size.as_u64(),
        });
    }
    if old.alignment != new.alignment {
        details.push(ChangeDetail::AlignmentChanged {
            old: old.alignment.as_u64(),
            new: new.alignment.as_u64(),
        });
    }
    for field in &new.fields {
        if let Some(previous) = old.get_field(&field.name) {
            if previous.offset != field.offset {
                details.push(ChangeDetail::FieldOffsetChanged {
                    name: field.name.clone(),
                    old: previous.offset.as_u64(),
                    new: field.offset.as_u64(),
                });
            }
        }
    }
    if old.is_polymorphic() != new.is_polymorphic() {
        details.push(ChangeDetail::VptrChanged {
            old: old.is_polymorphic(),
            new: new.is_polymorphic(),
        });
    }

    let old_count = old.slot_count();
    for difference in compare_vtables(old.vtable.as_ref(), new.vtable.as_ref()) {
        details.push(match difference {
            VTableDifference::Added { index, slot } => ChangeDetail::VTableSlotAdded { slot, index, old_count },
            VTableDifference::Removed { index, slot } => ChangeDetail::VTableSlotRemoved { slot, index },
            VTableDifference::Moved {
                slot,
                old_index,
                new_index,
            } => ChangeDetail::VTableSlotMoved {
                slot,
                old_index,
                new_index,
            },
        });
    }
}
