// Sun Jan 18 2026 - Alex

//! Two-pass construction of a [`DeclarationModel`] from a declaration stream.
//!
//! Pass 1 registers every name and kind. Pass 2 resolves written types
//! against the finished name table and may run in parallel, since it only
//! reads shared state. Cycle detection and override marking run last, once
//! every record is known.

pub mod registry;
pub mod resolver;
pub mod hierarchy;

pub use hierarchy::ClassHierarchy;
pub use registry::{NameTable, Registry};
pub use resolver::{lookup, Lookup, Resolver};

use crate::config::Config;
use crate::model::{DeclarationModel, ModelError};
use crate::syntax::{SourceVersion, SyntaxNode};
use crate::utils::logging::ScopedTimer;
use indexmap::IndexMap;
use rayon::prelude::*;
use resolver::{AliasCollapser, Resolved};
use std::collections::HashMap;
use thiserror::Error;

/// Every error collected while building one version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} error(s) while building `{label}`: {}", .errors.len(), summarize(.errors))]
pub struct BuildErrors {
    pub label: String,
    pub errors: Vec<ModelError>,
}

fn summarize(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub struct ModelBuilder<'c> {
    config: &'c Config,
}

impl<'c> ModelBuilder<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    pub fn build(&self, version: &SourceVersion) -> Result<DeclarationModel, BuildErrors> {
        self.build_nodes(&version.label, &version.nodes)
    }

    pub fn build_nodes(&self, label: &str, nodes: &[SyntaxNode]) -> Result<DeclarationModel, BuildErrors> {
        let _timer = ScopedTimer::new(&format!("build {}", label));

        let registration = Registry::new(self.config).register(nodes);
        let mut errors = registration.errors;

        let aliases = AliasCollapser::new(&registration.table, &registration.pending).collapse_all();
        let resolver = Resolver::new(&registration.table, &aliases);
        let results: Vec<Result<Resolved, Vec<ModelError>>> = if self.config.parallel {
            registration
                .pending
                .par_iter()
                .map(|pending| resolver.resolve_entity(pending))
                .collect()
        } else {
            registration
                .pending
                .iter()
                .map(|pending| resolver.resolve_entity(pending))
                .collect()
        };

        let mut entities = IndexMap::with_capacity(results.len());
        let mut explicit_overrides = HashMap::new();
        for result in results {
            match result {
                Ok(resolved) => {
                    let name = resolved.entity.name.clone();
                    if !resolved.explicit_overrides.is_empty() {
                        explicit_overrides.insert(name.clone(), resolved.explicit_overrides);
                    }
                    entities.insert(name, resolved.entity);
                }
                Err(mut entity_errors) => errors.append(&mut entity_errors),
            }
        }

        let hierarchy = ClassHierarchy::from_entities(&entities);
        let cycles = hierarchy.find_cycles();
        if cycles.is_empty() {
            errors.extend(hierarchy::resolve_overrides(&mut entities, &hierarchy, &explicit_overrides));
        } else {
            errors.extend(cycles);
        }

        let errors = dedup(errors);
        if !errors.is_empty() {
            for error in &errors {
                log::warn!("[{}] {}", label, error);
            }
            return Err(BuildErrors {
                label: label.to_string(),
                errors,
            });
        }

        log::info!(
            "Built model `{}`: {} entities, {} skipped",
            label,
            entities.len(),
            registration.skipped.len()
        );
        Ok(DeclarationModel::new(label, entities, registration.skipped))
    }
}

/// A failed alias surfaces once per use site; keep the first of each.
fn dedup(errors: Vec<ModelError>) -> Vec<ModelError> {
    let mut unique: Vec<ModelError> = Vec::with_capacity(errors.len());
    for error in errors {
        if !unique.contains(&error) {
            unique.push(error);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ConstantOrigin, ConstantValue, CycleKind, EntityBody, EntityKind, MethodKind, MethodRole, PrimitiveType,
        QualifiedName, TypeRef, Visibility,
    };
    use crate::model::RecordTag;
    use crate::syntax::{MethodSyntax, RecordSyntax, TypeSpec};
    use crate::utils::testing::{for_test_version, ForTestStage};

    fn build(nodes: Vec<SyntaxNode>) -> Result<DeclarationModel, BuildErrors> {
        let config = Config::default();
        ModelBuilder::new(&config).build_nodes("test", &nodes)
    }

    #[test]
    fn test_forward_reference_resolves() {
        let model = build(vec![
            SyntaxNode::record(&["ns"], RecordSyntax::new(RecordTag::Class, "C1").field("c2", TypeSpec::new("C2").pointer(1))),
            SyntaxNode::record(&["ns"], RecordSyntax::new(RecordTag::Class, "C2").field("x", TypeSpec::new("int"))),
        ])
        .unwrap();
        let c1 = model.record(&QualifiedName::parse("ns::C1")).unwrap();
        assert_eq!(c1.fields[0].ty, TypeRef::named(QualifiedName::parse("ns::C2")).with_pointer(1));
    }

    #[test]
    fn test_every_type_ref_resolves() {
        let version = for_test_version(ForTestStage::Destructor);
        let config = Config::default();
        let model = ModelBuilder::new(&config).build(&version).unwrap();
        assert!(model.type_refs().into_iter().all(|ty| model.resolves(ty)));
    }

    #[test]
    fn test_typedef_collapses_in_fields() {
        let model = build(vec![
            SyntaxNode::typedef(&["ns"], "CharsType", TypeSpec::new("char").array(7)),
            SyntaxNode::record(&["ns"], RecordSyntax::new(RecordTag::Struct, "S1").field("b", TypeSpec::new("CharsType"))),
        ])
        .unwrap();
        let s1 = model.record(&QualifiedName::parse("ns::S1")).unwrap();
        assert_eq!(s1.fields[0].ty, TypeRef::primitive(PrimitiveType::Char).with_extent(7));
    }

    #[test]
    fn test_unresolved_name_collects_every_error() {
        let err = build(vec![
            SyntaxNode::function(&["ns"], "f", TypeSpec::new("Missing"), vec![TypeSpec::new("AlsoMissing")]),
        ])
        .unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert!(err.errors.iter().all(|e| matches!(e, ModelError::Resolution { .. })));
    }

    #[test]
    fn test_base_cycle_is_an_error() {
        let err = build(vec![
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "A").base("B")),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "B").base("A")),
        ])
        .unwrap_err();
        assert_eq!(
            err.errors,
            vec![ModelError::Cycle {
                kind: CycleKind::BaseChain,
                path: vec![QualifiedName::parse("A"), QualifiedName::parse("B"), QualifiedName::parse("A")],
            }]
        );
    }

    #[test]
    fn test_multiple_and_virtual_inheritance_unsupported() {
        let err = build(vec![
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "A")),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "B")),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "C").base("A").base("B")),
        ])
        .unwrap_err();
        assert!(matches!(&err.errors[0], ModelError::Unsupported { entity, .. } if entity == "C"));

        let mut virtual_base = RecordSyntax::new(RecordTag::Class, "D").base("A");
        virtual_base.bases[0].is_virtual = true;
        let err = build(vec![
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "A")),
            SyntaxNode::record(&[], virtual_base),
        ])
        .unwrap_err();
        assert!(matches!(&err.errors[0], ModelError::Unsupported { reason, .. } if reason.contains("virtual")));
    }

    #[test]
    fn test_implicit_override_and_roles() {
        let model = build(vec![
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Class, "Base")
                    .method(MethodSyntax::new("Base", TypeSpec::void()))
                    .method(MethodSyntax::new("~Base", TypeSpec::void()).virtual_())
                    .method(MethodSyntax::new("run", TypeSpec::new("int")).pure()),
            ),
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Class, "Derived")
                    .base("Base")
                    .method(MethodSyntax::new("~Derived", TypeSpec::void()))
                    .method(MethodSyntax::new("run", TypeSpec::new("int"))),
            ),
        ])
        .unwrap();
        let base = model.record(&QualifiedName::parse("Base")).unwrap();
        assert_eq!(base.methods[0].role, MethodRole::Constructor);
        assert_eq!(base.methods[1].role, MethodRole::Destructor);

        let derived = model.record(&QualifiedName::parse("Derived")).unwrap();
        for method in &derived.methods {
            assert_eq!(method.kind, MethodKind::Virtual);
            assert_eq!(method.overrides, Some(QualifiedName::parse("Base")));
        }
    }

    #[test]
    fn test_explicit_override_without_base_virtual() {
        let err = build(vec![
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "Base")),
            SyntaxNode::record(
                &[],
                RecordSyntax::new(RecordTag::Class, "Derived")
                    .base("Base")
                    .method(MethodSyntax::new("run", TypeSpec::new("int")).override_()),
            ),
        ])
        .unwrap_err();
        assert_eq!(
            err.errors,
            vec![ModelError::InvalidOverride {
                record: "Derived".into(),
                method: "run()".into()
            }]
        );
    }

    #[test]
    fn test_enum_values_follow_c_rules() {
        let model = build(vec![SyntaxNode::enumeration(
            &["ns"],
            "EnumType",
            &[("ENUM_START", None), ("ENUM_MIDDLE", Some("0x0A")), ("ENUM_END", None)],
        )])
        .unwrap();
        let entity = model.get(&QualifiedName::parse("ns::EnumType")).unwrap();
        let EntityBody::Enum(enumeration) = &entity.body else {
            panic!("expected enum");
        };
        let values: Vec<i128> = enumeration.members.iter().map(|m| m.value).collect();
        assert_eq!(values, vec![0, 10, 11]);
        assert_eq!(enumeration.underlying, PrimitiveType::Int);
    }

    #[test]
    fn test_constants_and_skips() {
        let model = build(vec![
            SyntaxNode::variable(&["ns"], "CONST_1", TypeSpec::new("int").constant(), Some("3")),
            SyntaxNode::variable(&["ns"], "counter", TypeSpec::new("int"), Some("0")),
            SyntaxNode::macro_def("DEFINE_1", "'1'"),
        ])
        .unwrap();
        let constant = model.get(&QualifiedName::parse("ns::CONST_1")).unwrap();
        assert!(matches!(&constant.body, EntityBody::Constant(c) if c.value == ConstantValue::Integer(3)));
        let define = model.get(&QualifiedName::parse("DEFINE_1")).unwrap();
        assert!(matches!(&define.body, EntityBody::Constant(c) if c.origin == ConstantOrigin::Macro));
        assert_eq!(model.skipped().len(), 1);
        assert!(!model.contains(&QualifiedName::parse("ns::counter")));
    }

    #[test]
    fn test_computed_constant_is_skipped() {
        let mut version = for_test_version(ForTestStage::Plain);
        version.nodes.push(SyntaxNode::variable(
            &["for_test_namespace"],
            "SIZE",
            TypeSpec::new("int").constant(),
            Some("CONST_2 * 2"),
        ));
        let model = ModelBuilder::new(&Config::default()).build(&version).unwrap();
        let size = QualifiedName::new(vec!["for_test_namespace".into()], "SIZE");
        assert!(model.get(&size).is_none());
        assert!(model
            .skipped()
            .iter()
            .any(|s| s.name == size && s.reason.contains("literal")));
        assert!(model.get(&QualifiedName::new(vec!["for_test_namespace".into()], "CONST_2")).is_some());
    }

    #[test]
    fn test_internal_entities_are_registered_but_hidden() {
        let model = build(vec![
            SyntaxNode::function(&["ns", ""], "hidden", TypeSpec::void(), vec![]),
            SyntaxNode::function(&["ns"], "file_static", TypeSpec::void(), vec![]).internal(),
            SyntaxNode::function(&["ns"], "visible", TypeSpec::void(), vec![]),
        ])
        .unwrap();
        let hidden = model.get(&QualifiedName::new(vec!["ns".into(), "".into()], "hidden")).unwrap();
        assert_eq!(hidden.visibility, Visibility::Internal);
        let public: Vec<String> = model
            .public_entities()
            .filter(|e| e.kind() == EntityKind::Function)
            .map(|e| e.name.to_string())
            .collect();
        assert_eq!(public, vec!["ns::visible"]);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let version = for_test_version(ForTestStage::Destructor);
        let parallel = Config::default();
        let sequential = Config::default().with_parallel(false);
        let a = ModelBuilder::new(&parallel).build(&version).unwrap();
        let b = ModelBuilder::new(&sequential).build(&version).unwrap();
        let a: Vec<_> = a.iter().cloned().collect();
        let b: Vec<_> = b.iter().cloned().collect();
        assert_eq!(a, b);
    }
}
