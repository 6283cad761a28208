// Tue Jan 15 2026 - Alex

use crate::diff::record::compare_records;
use crate::diff::{Change, ChangeDetail};
use crate::model::{Constant, Entity, EntityBody, Enumeration, Function, QualifiedName};
use crate::structure::AnnotatedModel;
use std::collections::{BTreeSet, HashMap};

/// Compares the public surfaces of two layout-annotated versions.
///
/// Entities are matched by qualified name only. The output is sorted by
/// name, so it does not depend on declaration order; details inside one
/// entity keep declared field and method order.
pub struct DiffEngine<'a> {
    old: &'a AnnotatedModel,
    new: &'a AnnotatedModel,
}

impl<'a> DiffEngine<'a> {
    pub fn new(old: &'a AnnotatedModel, new: &'a AnnotatedModel) -> Self {
        Self { old, new }
    }

    pub fn compare(&self) -> Vec<Change> {
        let old: HashMap<&QualifiedName, &Entity> =
            self.old.model().public_entities().map(|e| (&e.name, e)).collect();
        let new: HashMap<&QualifiedName, &Entity> =
            self.new.model().public_entities().map(|e| (&e.name, e)).collect();
        let names: BTreeSet<&QualifiedName> = old.keys().chain(new.keys()).copied().collect();

        let mut changes = Vec::new();
        for name in names {
            match (old.get(name), new.get(name)) {
                (Some(before), Some(after)) => {
                    let details = self.compare_entities(before, after);
                    if !details.is_empty() {
                        changes.push(Change::modified(name, after.kind(), details));
                    }
                }
                (Some(before), None) => changes.push(Change::removed(name, before.kind())),
                (None, Some(after)) => changes.push(Change::added(name, after.kind())),
                (None, None) => {}
            }
        }
        log::info!(
            "Compared {} -> {}: {} changed entities",
            self.old.label(),
            self.new.label(),
            changes.len()
        );
        changes
    }

    fn compare_entities(&self, old: &Entity, new: &Entity) -> Vec<ChangeDetail> {
        // A struct/class keyword swap is still the same record.
        if let (Some(before), Some(after)) = (old.as_record(), new.as_record()) {
            let mut details = Vec::new();
            if before.tag != after.tag {
                details.push(ChangeDetail::RecordTagChanged {
                    old: before.tag,
                    new: after.tag,
                });
            }
            details.extend(compare_records(
                before,
                after,
                self.old.layout_result(&old.name),
                self.new.layout_result(&new.name),
            ));
            return details;
        }
        if old.kind() != new.kind() {
            return vec![ChangeDetail::KindChanged {
                old: old.kind(),
                new: new.kind(),
            }];
        }
        match (&old.body, &new.body) {
            (EntityBody::TypedefAlias(before), EntityBody::TypedefAlias(after)) => {
                if before.target != after.target {
                    vec![ChangeDetail::AliasTargetChanged {
                        old: before.target.clone(),
                        new: after.target.clone(),
                    }]
                } else {
                    Vec::new()
                }
            }
            (EntityBody::Enum(before), EntityBody::Enum(after)) => compare_enums(before, after),
            (EntityBody::Constant(before), EntityBody::Constant(after)) => compare_constants(before, after),
            (EntityBody::Function(before), EntityBody::Function(after)) => compare_functions(before, after),
            _ => Vec::new(),
        }
    }
}

/// Enumerators are compared per member by name.
fn compare_enums(old: &Enumeration, new: &Enumeration) -> Vec<ChangeDetail> {
    let mut details = Vec::new();
    if old.underlying != new.underlying {
        details.push(ChangeDetail::EnumUnderlyingChanged {
            old: old.underlying,
            new: new.underlying,
        });
    }
    for member in &old.members {
        match new.member(&member.name) {
            None => details.push(ChangeDetail::EnumMemberRemoved {
                name: member.name.clone(),
                value: member.value,
            }),
            Some(current) if current.value != member.value => details.push(ChangeDetail::EnumValueChanged {
                name: member.name.clone(),
                old: member.value,
                new: current.value,
            }),
            Some(_) => {}
        }
    }
    for member in &new.members {
        if old.member(&member.name).is_none() {
            details.push(ChangeDetail::EnumMemberAdded {
                name: member.name.clone(),
                value: member.value,
            });
        }
    }
    details
}

fn compare_constants(old: &Constant, new: &Constant) -> Vec<ChangeDetail> {
    let mut details = Vec::new();
    if old.ty != new.ty {
        details.push(ChangeDetail::ConstantTypeChanged {
            old: old.ty.clone(),
            new: new.ty.clone(),
        });
    }
    if old.value != new.value {
        details.push(ChangeDetail::ConstantValueChanged {
            old: old.value.clone(),
            new: new.value.clone(),
        });
    }
    details
}

fn compare_functions(old: &Function, new: &Function) -> Vec<ChangeDetail> {
    let mut details = Vec::new();
    if old.ret != new.ret {
        details.push(ChangeDetail::FunctionReturnChanged {
            old: old.ret.clone(),
            new: new.ret.clone(),
        });
    }
    if old.param_types() != new.param_types() {
        details.push(ChangeDetail::FunctionParamsChanged {
            old: old.params.iter().map(|p| p.ty.clone()).collect(),
            new: new.params.iter().map(|p| p.ty.clone()).collect(),
        });
    }
    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;
    use crate::model::{EntityKind, RecordTag};
    use crate::syntax::{RecordSyntax, SyntaxNode, TypeSpec};
    use crate::utils::testing::{annotate, for_test_nodes, replace_node, s1, ForTestStage, NS};

    #[test]
    fn test_self_diff_is_empty() {
        let model = annotate("v", &for_test_nodes(ForTestStage::Destructor));
        assert!(DiffEngine::new(&model, &model).compare().is_empty());
    }

    #[test]
    fn test_order_independent() {
        let old = annotate("old", &for_test_nodes(ForTestStage::PureVirtual));
        let nodes = for_test_nodes(ForTestStage::PassVariants);
        let mut reversed = nodes.clone();
        reversed.reverse();
        let forward = DiffEngine::new(&old, &annotate("new", &nodes)).compare();
        let backward = DiffEngine::new(&old, &annotate("new", &reversed)).compare();
        assert_eq!(forward, backward);
        assert!(!forward.is_empty());
        assert!(forward.windows(2).all(|pair| pair[0].name < pair[1].name));
    }

    #[test]
    fn test_added_and_removed_entities() {
        let old = annotate("old", &for_test_nodes(ForTestStage::Plain));
        let new = annotate("new", &for_test_nodes(ForTestStage::BuildFunction));
        let changes = DiffEngine::new(&old, &new).compare();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert_eq!(changes[0].entity_kind, EntityKind::Function);
        assert_eq!(changes[0].name.to_string(), "for_test_namespace::build_s1");

        let back = DiffEngine::new(&new, &old).compare();
        assert_eq!(back[0].kind, ChangeKind::Removed);
    }

    #[test]
    fn test_reorder_reports_offsets() {
        let old = annotate("old", &for_test_nodes(ForTestStage::Plain));
        let mut nodes = for_test_nodes(ForTestStage::Plain);
        replace_node(&mut nodes, s1(&[("b", TypeSpec::new("CharsType")), ("a", TypeSpec::new("int"))]));
        let new = annotate("new", &nodes);
        let changes = DiffEngine::new(&old, &new).compare();
        assert_eq!(changes.len(), 1);
        let details = &changes[0].details;
        assert!(details.iter().any(|d| matches!(d, ChangeDetail::FieldsReordered { .. })));
        assert!(details.contains(&ChangeDetail::FieldOffsetChanged {
            name: "a".into(),
            old: 0,
            new: 8
        }));
        assert!(details.contains(&ChangeDetail::FieldOffsetChanged {
            name: "b".into(),
            old: 4,
            new: 0
        }));
        assert!(!details.iter().any(|d| matches!(d, ChangeDetail::SizeChanged { .. })));
    }

    #[test]
    fn test_enum_changes_per_member() {
        let old = annotate(
            "old",
            &[SyntaxNode::enumeration(&[NS], "E", &[("A", None), ("B", None), ("C", None)])],
        );
        let new = annotate(
            "new",
            &[SyntaxNode::enumeration(&[NS], "E", &[("A", None), ("C", Some("5")), ("D", None)])],
        );
        let changes = DiffEngine::new(&old, &new).compare();
        assert_eq!(
            changes[0].details,
            vec![
                ChangeDetail::EnumMemberRemoved { name: "B".into(), value: 1 },
                ChangeDetail::EnumValueChanged { name: "C".into(), old: 2, new: 5 },
                ChangeDetail::EnumMemberAdded { name: "D".into(), value: 6 },
            ]
        );
    }

    #[test]
    fn test_internal_entities_are_not_compared() {
        let old = annotate("old", &[SyntaxNode::function(&[NS, ""], "helper", TypeSpec::void(), vec![])]);
        let new = annotate("new", &[]);
        let changes = DiffEngine::new(&old, &new).compare();
        assert!(changes.iter().all(|c| c.name.name() != "helper"));
    }

    #[test]
    fn test_struct_to_class_keeps_member_details() {
        let old = annotate(
            "old",
            &[SyntaxNode::record(&[NS], RecordSyntax::new(RecordTag::Struct, "S").field("a", TypeSpec::new("int")))],
        );
        let new = annotate(
            "new",
            &[SyntaxNode::record(
                &[NS],
                RecordSyntax::new(RecordTag::Class, "S")
                    .field("a", TypeSpec::new("int"))
                    .field("b", TypeSpec::new("long")),
            )],
        );
        let changes = DiffEngine::new(&old, &new).compare();
        assert_eq!(changes.len(), 1);
        let change = &changes[0];
        assert_eq!(change.entity_kind, EntityKind::Class);
        assert_eq!(
            change.details[0],
            ChangeDetail::RecordTagChanged {
                old: RecordTag::Struct,
                new: RecordTag::Class
            }
        );
        assert!(change.has_detail(|d| matches!(d, ChangeDetail::FieldAdded { trailing: true, .. })));
        assert!(change.has_detail(|d| *d == ChangeDetail::SizeChanged { old: 4, new: 16 }));
        assert!(!change.has_detail(|d| matches!(d, ChangeDetail::KindChanged { .. })));
    }
}
