// Sun Jan 18 2026 - Alex

use crate::config::Config;
use crate::model::{DeclarationModel, EntityBody, QualifiedName, Record, TypeBase, TypeRef};
use crate::structure::{Alignment, FieldLayout, LayoutError, Offset, RecordLayout, Size, VTableBuilder};
use crate::utils::logging::ScopedTimer;
use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

pub type LayoutResult = Result<RecordLayout, LayoutError>;
pub type LayoutMap = IndexMap<QualifiedName, LayoutResult>;

/// A declaration model together with the layout of each of its records.
#[derive(Debug, Clone)]
pub struct AnnotatedModel {
    model: DeclarationModel,
    layouts: LayoutMap,
}

impl AnnotatedModel {
    pub fn model(&self) -> &DeclarationModel {
        &self.model
    }

    pub fn label(&self) -> &str {
        self.model.label()
    }

    /// Every record's outcome, in declaration order.
    pub fn layouts(&self) -> &LayoutMap {
        &self.layouts
    }

    pub fn layout(&self, name: &QualifiedName) -> Option<&RecordLayout> {
        self.layouts.get(name).and_then(|r| r.as_ref().ok())
    }

    pub fn layout_result(&self, name: &QualifiedName) -> Option<&LayoutResult> {
        self.layouts.get(name)
    }

    pub fn layout_errors(&self) -> impl Iterator<Item = &LayoutError> {
        self.layouts.values().filter_map(|r| r.as_ref().err())
    }
}

/// Groups records into levels where every record depends only on records
/// of earlier levels. Records left over sit on a dependency cycle.
pub fn dependency_levels(model: &DeclarationModel) -> (Vec<Vec<QualifiedName>>, Vec<QualifiedName>) {
    let mut remaining: IndexMap<&QualifiedName, HashSet<&QualifiedName>> = model
        .records()
        .map(|(name, record)| (name, dependencies(model, record)))
        .collect();

    let mut levels = Vec::new();
    loop {
        let ready: Vec<&QualifiedName> = remaining
            .iter()
            .filter(|(_, deps)| deps.is_empty())
            .map(|(name, _)| *name)
            .collect();
        if ready.is_empty() {
            break;
        }
        for name in &ready {
            remaining.shift_remove(*name);
        }
        for deps in remaining.values_mut() {
            for name in &ready {
                deps.remove(*name);
            }
        }
        levels.push(ready.into_iter().cloned().collect());
    }
    let unordered = remaining.keys().map(|n| (*n).clone()).collect();
    (levels, unordered)
}

fn dependencies<'m>(model: &'m DeclarationModel, record: &'m Record) -> HashSet<&'m QualifiedName> {
    record
        .base
        .iter()
        .chain(record.fields.iter().filter_map(|f| f.ty.embedded_name()))
        .filter(|name| model.record(name).is_some())
        .collect()
}

pub struct LayoutEstimator<'c> {
    config: &'c Config,
}

impl<'c> LayoutEstimator<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Lays out every record, dependencies first. A failure only poisons
    /// the records that embed or derive from the failed one.
    pub fn estimate(&self, model: DeclarationModel) -> AnnotatedModel {
        let _timer = ScopedTimer::new(&format!("layout {}", model.label()));
        let (levels, unordered) = dependency_levels(&model);

        let mut done: HashMap<QualifiedName, LayoutResult> = HashMap::new();
        for level in &levels {
            let computed: Vec<(QualifiedName, LayoutResult)> = if self.config.parallel {
                level
                    .par_iter()
                    .map(|name| (name.clone(), self.layout_record(&model, name, &done)))
                    .collect()
            } else {
                level
                    .iter()
                    .map(|name| (name.clone(), self.layout_record(&model, name, &done)))
                    .collect()
            };
            done.extend(computed);
        }
        for name in unordered {
            let record = name.to_string();
            done.insert(name, Err(LayoutError::Unordered { record }));
        }

        let layouts: LayoutMap = model
            .records()
            .map(|(name, _)| {
                let result = done.remove(name).unwrap_or_else(|| {
                    Err(LayoutError::Unordered {
                        record: name.to_string(),
                    })
                });
                (name.clone(), result)
            })
            .collect();

        for error in layouts.values().filter_map(|r| r.as_ref().err()) {
            log::warn!("[{}] {}", model.label(), error);
        }
        log::debug!("Estimated {} layouts in {} levels for {}", layouts.len(), levels.len(), model.label());
        AnnotatedModel { model, layouts }
    }

    fn layout_record(
        &self,
        model: &DeclarationModel,
        name: &QualifiedName,
        done: &HashMap<QualifiedName, LayoutResult>,
    ) -> LayoutResult {
        let record_name = name.to_string();
        let overflow = || LayoutError::Overflow {
            record: record_name.clone(),
        };
        let record = model
            .record(name)
            .ok_or_else(|| LayoutError::Incomplete { record: record_name.clone() })?;
        if !record.is_complete {
            return Err(LayoutError::Incomplete { record: record_name.clone() });
        }

        let data_model = self.config.data_model;
        let base = match &record.base {
            Some(base) => Some(dependency(done, &record_name, base)?),
            None => None,
        };
        let inherits_vtable = base.map(RecordLayout::is_polymorphic).unwrap_or(false);
        let polymorphic = inherits_vtable || record.declares_virtuals();
        let has_own_vptr = polymorphic && !inherits_vtable;

        let mut offset = 0u64;
        let mut alignment = Alignment::byte();
        if has_own_vptr {
            let (size, align) = data_model.pointer_layout();
            offset = size.as_u64();
            alignment = align;
        }

        let mut base_size = Size::zero();
        if let Some(base) = base.filter(|b| !b.is_empty) {
            offset = base
                .alignment
                .align(offset)
                .and_then(|start| start.checked_add(base.size.as_u64()))
                .ok_or_else(overflow)?;
            base_size = base.size;
            alignment = alignment.max(base.alignment);
        }

        let mut fields = Vec::with_capacity(record.fields.len());
        for field in &record.fields {
            let (size, align) = self.type_layout(model, &record_name, &field.name, &field.ty, done)?;
            offset = align.align(offset).ok_or_else(overflow)?;
            fields.push(FieldLayout {
                name: field.name.clone(),
                ty: field.ty.clone(),
                offset: Offset::new(offset),
                size,
                alignment: align,
            });
            offset = offset.checked_add(size.as_u64()).ok_or_else(overflow)?;
            alignment = alignment.max(align);
        }

        let is_empty = fields.is_empty() && !polymorphic && base.map(|b| b.is_empty).unwrap_or(true);
        let size = alignment.align(offset).ok_or_else(overflow)?.max(1);

        let vtable = polymorphic.then(|| {
            let slots = self.config.virtual_destructor_slots.min(u8::MAX as usize) as u8;
            let mut builder = VTableBuilder::new(name, slots);
            if let Some(table) = base.and_then(|b| b.vtable.as_ref()) {
                builder = builder.with_base(table);
            }
            record
                .methods
                .iter()
                .fold(builder, |builder, method| builder.add_method(method))
                .build()
        });

        Ok(RecordLayout {
            name: name.clone(),
            size: Size::new(size),
            alignment,
            has_own_vptr,
            base_size,
            fields,
            vtable,
            is_empty,
        })
    }

    fn type_layout(
        &self,
        model: &DeclarationModel,
        record: &str,
        field: &str,
        ty: &TypeRef,
        done: &HashMap<QualifiedName, LayoutResult>,
    ) -> Result<(Size, Alignment), LayoutError> {
        let data_model = self.config.data_model;
        let unknown = || LayoutError::UnknownSize {
            record: record.to_string(),
            field: field.to_string(),
            ty: ty.to_string(),
        };

        let (size, align) = if !ty.is_by_value() {
            data_model.pointer_layout()
        } else {
            match &ty.base {
                TypeBase::Primitive(p) => data_model.primitive_layout(*p).ok_or_else(unknown)?,
                TypeBase::Named(name) => match model.get(name).map(|e| &e.body) {
                    Some(EntityBody::Enum(enumeration)) => {
                        data_model.primitive_layout(enumeration.underlying).ok_or_else(unknown)?
                    }
                    Some(EntityBody::Struct(_)) | Some(EntityBody::Class(_)) => {
                        let layout = dependency(done, record, name)?;
                        (layout.size, layout.alignment)
                    }
                    _ => return Err(unknown()),
                },
            }
        };
        let size = if ty.is_array() {
            size.times(ty.array_extent).ok_or_else(unknown)?
        } else {
            size
        };
        Ok((size, align))
    }
}

fn dependency<'d>(
    done: &'d HashMap<QualifiedName, LayoutResult>,
    record: &str,
    name: &QualifiedName,
) -> Result<&'d RecordLayout, LayoutError> {
    match done.get(name) {
        Some(Ok(layout)) => Ok(layout),
        _ => Err(LayoutError::DependencyFailed {
            record: record.to_string(),
            dependency: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataModel;
    use crate::model::RecordTag;
    use crate::syntax::{MethodSyntax, RecordSyntax, SyntaxNode, TypeSpec};
    use crate::utils::testing::{build_model, for_test_nodes, s1, ForTestStage, NS};

    fn annotate(nodes: &[SyntaxNode]) -> AnnotatedModel {
        let config = Config::default();
        LayoutEstimator::new(&config).estimate(build_model("test", nodes))
    }

    fn offsets(model: &AnnotatedModel, name: &str) -> Vec<(String, u64)> {
        model
            .layout(&QualifiedName::parse(name))
            .unwrap()
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.offset.as_u64()))
            .collect()
    }

    #[test]
    fn test_s1_packing() {
        let model = annotate(&for_test_nodes(ForTestStage::Plain));
        let s1 = model.layout(&QualifiedName::parse("for_test_namespace::S1")).unwrap();
        assert_eq!(offsets(&model, "for_test_namespace::S1"), vec![("a".into(), 0), ("b".into(), 4)]);
        assert_eq!(s1.size.as_u64(), 12);
        assert_eq!(s1.alignment.as_u64(), 4);
        assert!(s1.vtable.is_none());
    }

    #[test]
    fn test_reordered_s1() {
        let mut nodes = for_test_nodes(ForTestStage::Plain);
        crate::utils::testing::replace_node(
            &mut nodes,
            s1(&[("b", TypeSpec::new("CharsType")), ("a", TypeSpec::new("int"))]),
        );
        let model = annotate(&nodes);
        assert_eq!(offsets(&model, "for_test_namespace::S1"), vec![("b".into(), 0), ("a".into(), 8)]);
    }

    #[test]
    fn test_abstract_class_reserves_slot() {
        let model = annotate(&for_test_nodes(ForTestStage::Composition));
        let c2 = model.layout(&QualifiedName::parse("for_test_namespace::C2")).unwrap();
        assert!(c2.has_own_vptr);
        assert_eq!(c2.size.as_u64(), 8);
        let vtable = c2.vtable.as_ref().unwrap();
        assert_eq!(vtable.entry_count(), 1);
        assert!(vtable.entries[0].is_pure);

        let c1 = model.layout(&QualifiedName::parse("for_test_namespace::C1")).unwrap();
        assert!(c1.vtable.is_none());
        assert_eq!(c1.size.as_u64(), 8);
    }

    #[test]
    fn test_derived_layout_follows_base() {
        let model = annotate(&[
            SyntaxNode::record(
                &[NS],
                RecordSyntax::new(RecordTag::Class, "Base")
                    .field("x", TypeSpec::new("int"))
                    .method(MethodSyntax::new("f", TypeSpec::void()).virtual_()),
            ),
            SyntaxNode::record(
                &[NS],
                RecordSyntax::new(RecordTag::Class, "Derived")
                    .base("Base")
                    .field("y", TypeSpec::new("char"))
                    .method(MethodSyntax::new("g", TypeSpec::void()).virtual_())
                    .method(MethodSyntax::new("f", TypeSpec::void())),
            ),
        ]);
        let base = model.layout(&QualifiedName::parse("for_test_namespace::Base")).unwrap();
        assert_eq!(base.size.as_u64(), 16);
        let derived = model.layout(&QualifiedName::parse("for_test_namespace::Derived")).unwrap();
        assert!(!derived.has_own_vptr);
        assert_eq!(derived.base_size.as_u64(), 16);
        assert_eq!(offsets(&model, "for_test_namespace::Derived"), vec![("y".into(), 16)]);
        assert_eq!(derived.size.as_u64(), 24);
        let slots: Vec<String> = derived
            .vtable
            .as_ref()
            .unwrap()
            .entries
            .iter()
            .map(|e| e.key.to_string())
            .collect();
        assert_eq!(slots, vec!["f()", "g()"]);
    }

    #[test]
    fn test_empty_struct_and_empty_base() {
        let model = annotate(&[
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Struct, "Empty")),
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Struct, "Child").base("Empty").field("v", TypeSpec::new("int")),
            ),
        ]);
        let empty = model.layout(&QualifiedName::parse("Empty")).unwrap();
        assert_eq!(empty.size.as_u64(), 1);
        assert!(empty.is_empty);
        assert_eq!(offsets(&model, "Child"), vec![("v".into(), 0)]);
    }

    #[test]
    fn test_failure_is_local_to_dependents() {
        let model = annotate(&[
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "Opaque").forward()),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Struct, "Holder").field("o", TypeSpec::new("Opaque"))),
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Struct, "Handle").field("o", TypeSpec::new("Opaque").pointer(1)),
            ),
        ]);
        assert!(matches!(
            model.layout_result(&QualifiedName::parse("Opaque")),
            Some(Err(LayoutError::Incomplete { .. }))
        ));
        assert!(matches!(
            model.layout_result(&QualifiedName::parse("Holder")),
            Some(Err(LayoutError::DependencyFailed { dependency, .. })) if dependency == "Opaque"
        ));
        assert_eq!(model.layout(&QualifiedName::parse("Handle")).unwrap().size.as_u64(), 8);
        assert_eq!(model.layout_errors().count(), 2);
    }

    #[test]
    fn test_data_model_changes_sizes() {
        let nodes = vec![SyntaxNode::record(
            &[],
            RecordSyntax::new(RecordTag::Struct, "Mixed")
                .field("l", TypeSpec::new("long"))
                .field("p", TypeSpec::new("char").pointer(1)),
        )];
        let config = Config::default().with_data_model(DataModel::Ilp32);
        let model = LayoutEstimator::new(&config).estimate(build_model("ilp32", &nodes));
        assert_eq!(model.layout(&QualifiedName::parse("Mixed")).unwrap().size.as_u64(), 8);
        let model = annotate(&nodes);
        assert_eq!(model.layout(&QualifiedName::parse("Mixed")).unwrap().size.as_u64(), 16);
    }

    #[test]
    fn test_levels_put_dependencies_first() {
        let model = build_model(
            "levels",
            &[
                SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Struct, "Outer").field("i", TypeSpec::new("Inner"))),
                SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Struct, "Inner").field("v", TypeSpec::new("int"))),
            ],
        );
        let (levels, unordered) = dependency_levels(&model);
        assert!(unordered.is_empty());
        assert_eq!(levels, vec![vec![QualifiedName::parse("Inner")], vec![QualifiedName::parse("Outer")]]);
    }

    #[test]
    fn test_oversized_records_fail_alone() {
        let model = annotate(&[
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Struct, "Big")
                    .field("a", TypeSpec::new("int"))
                    .field("b", TypeSpec::new("char").array(u64::MAX)),
            ),
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Struct, "Wide").field("w", TypeSpec::new("int").array(u64::MAX)),
            ),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Struct, "Small").field("v", TypeSpec::new("int"))),
        ]);
        assert!(matches!(
            model.layout_result(&QualifiedName::parse("Big")),
            Some(Err(LayoutError::Overflow { record })) if record == "Big"
        ));
        assert!(matches!(
            model.layout_result(&QualifiedName::parse("Wide")),
            Some(Err(LayoutError::UnknownSize { field, .. })) if field == "w"
        ));
        assert_eq!(model.layout(&QualifiedName::parse("Small")).unwrap().size.as_u64(), 4);
    }
}
