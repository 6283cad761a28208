// Sun Jan 18 2026 - Alex

//! First pass: register every declared name and kind before any type is resolved.

use crate::config::Config;
use crate::model::{
    EntityKind, ModelError, QualifiedName, SkippedDeclaration, Visibility, ANONYMOUS_SEGMENT,
};
use crate::syntax::{parse_literal, parse_literal_list, DeclSyntax, Initializer, ParsedLiteral, SyntaxNode};
use indexmap::IndexMap;

/// A registered declaration waiting for pass 2.
#[derive(Debug, Clone)]
pub struct Pending<'a> {
    pub name: QualifiedName,
    pub kind: EntityKind,
    pub visibility: Visibility,
    pub doc: Option<String>,
    pub source: PendingSource<'a>,
}

#[derive(Debug, Clone)]
pub enum PendingSource<'a> {
    /// Namespace opened implicitly by a scope path.
    ImplicitNamespace,
    Node(&'a SyntaxNode),
    /// Object-like macro whose body already parsed as a literal.
    Macro(ParsedLiteral),
}

/// Every name of one version mapped to its kind. Read-only after pass 1.
#[derive(Debug, Default)]
pub struct NameTable {
    kinds: IndexMap<QualifiedName, EntityKind>,
}

impl NameTable {
    pub fn kind_of(&self, name: &QualifiedName) -> Option<EntityKind> {
        self.kinds.get(name).copied()
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.kinds.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}

pub struct Registration<'a> {
    pub table: NameTable,
    pub pending: Vec<Pending<'a>>,
    pub skipped: Vec<SkippedDeclaration>,
    pub errors: Vec<ModelError>,
}

pub struct Registry<'c> {
    config: &'c Config,
}

impl<'c> Registry<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    pub fn register<'a>(&self, nodes: &'a [SyntaxNode]) -> Registration<'a> {
        let mut reg = Registration {
            table: NameTable::default(),
            pending: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
        };
        let mut index: IndexMap<QualifiedName, usize> = IndexMap::new();

        for node in nodes {
            self.open_scopes(&node.scope, &mut reg, &mut index);

            let kind = match &node.decl {
                DeclSyntax::Namespace { name } => {
                    let name = QualifiedName::new(
                        node.scope.clone(),
                        name.clone().unwrap_or_else(|| ANONYMOUS_SEGMENT.to_string()),
                    );
                    self.register_namespace(name, node.doc.clone(), &mut reg, &mut index);
                    continue;
                }
                DeclSyntax::Macro { name, body } => {
                    self.register_macro(name, body.as_deref(), node, &mut reg, &mut index);
                    continue;
                }
                DeclSyntax::Variable { name, ty, .. } if !ty.is_const => {
                    let name = QualifiedName::new(node.scope.clone(), name.clone());
                    log::debug!("Skipping non-const variable {}", name);
                    reg.skipped.push(SkippedDeclaration {
                        name,
                        reason: "non-const variable".to_string(),
                    });
                    continue;
                }
                DeclSyntax::Variable {
                    name,
                    initializer: Some(initializer),
                    ..
                } if !is_literal_initializer(initializer) => {
                    let name = QualifiedName::new(node.scope.clone(), name.clone());
                    log::debug!("Skipping constant {} with a computed initializer", name);
                    reg.skipped.push(SkippedDeclaration {
                        name,
                        reason: "initializer is not a literal".to_string(),
                    });
                    continue;
                }
                DeclSyntax::Variable { .. } => EntityKind::Constant,
                DeclSyntax::Typedef { .. } => EntityKind::TypedefAlias,
                DeclSyntax::Enum { .. } => EntityKind::Enum,
                DeclSyntax::Function(_) => EntityKind::Function,
                DeclSyntax::Record(record) => match record.tag {
                    crate::model::RecordTag::Struct => EntityKind::Struct,
                    crate::model::RecordTag::Class => EntityKind::Class,
                },
            };

            let Some(local) = node.decl.name() else {
                continue;
            };
            let name = QualifiedName::new(node.scope.clone(), local);
            let visibility = visibility_of(&name, node.internal_linkage);

            if let Some(&existing) = index.get(&name) {
                if let Some(replacement) = merge_record(&reg.pending[existing], node, kind) {
                    reg.table.kinds.insert(name.clone(), kind);
                    reg.pending[existing] = Pending {
                        kind,
                        doc: node.doc.clone().or_else(|| reg.pending[existing].doc.clone()),
                        source: replacement,
                        ..reg.pending[existing].clone()
                    };
                } else if !is_redundant_forward(&reg.pending[existing], node) {
                    reg.errors.push(ModelError::Duplicate(name.to_string()));
                }
                continue;
            }

            index.insert(name.clone(), reg.pending.len());
            reg.table.kinds.insert(name.clone(), kind);
            reg.pending.push(Pending {
                name,
                kind,
                visibility,
                doc: node.doc.clone(),
                source: PendingSource::Node(node),
            });
        }

        log::debug!(
            "Registered {} names ({} skipped, {} errors)",
            reg.table.len(),
            reg.skipped.len(),
            reg.errors.len()
        );
        reg
    }

    fn open_scopes(
        &self,
        scope: &[String],
        reg: &mut Registration<'_>,
        index: &mut IndexMap<QualifiedName, usize>,
    ) {
        for depth in 0..scope.len() {
            let name = QualifiedName::new(scope[..depth].to_vec(), scope[depth].clone());
            if !index.contains_key(&name) {
                self.register_namespace(name, None, reg, index);
            }
        }
    }

    fn register_namespace(
        &self,
        name: QualifiedName,
        doc: Option<String>,
        reg: &mut Registration<'_>,
        index: &mut IndexMap<QualifiedName, usize>,
    ) {
        if let Some(&existing) = index.get(&name) {
            match reg.table.kind_of(&name) {
                Some(EntityKind::Namespace) => {
                    // namespaces reopen freely; keep the first doc comment seen
                    if reg.pending[existing].doc.is_none() {
                        reg.pending[existing].doc = doc;
                    }
                }
                _ => reg.errors.push(ModelError::Duplicate(name.to_string())),
            }
            return;
        }
        let visibility = if name.in_anonymous_scope() || name.name() == ANONYMOUS_SEGMENT {
            Visibility::Internal
        } else {
            Visibility::Public
        };
        index.insert(name.clone(), reg.pending.len());
        reg.table.kinds.insert(name.clone(), EntityKind::Namespace);
        reg.pending.push(Pending {
            name,
            kind: EntityKind::Namespace,
            visibility,
            doc,
            source: PendingSource::ImplicitNamespace,
        });
    }

    fn register_macro<'a>(
        &self,
        name: &str,
        body: Option<&str>,
        node: &'a SyntaxNode,
        reg: &mut Registration<'a>,
        index: &mut IndexMap<QualifiedName, usize>,
    ) {
        let qualified = QualifiedName::global(name);
        if self.config.skip_reserved_macros && name.starts_with('_') {
            log::trace!("Skipping reserved macro {}", name);
            return;
        }
        let Some(literal) = body.and_then(parse_literal) else {
            log::debug!("Skipping macro {} without a literal body", name);
            reg.skipped.push(SkippedDeclaration {
                name: qualified,
                reason: "macro body is not a literal".to_string(),
            });
            return;
        };
        if index.contains_key(&qualified) {
            reg.errors.push(ModelError::Duplicate(qualified.to_string()));
            return;
        }
        index.insert(qualified.clone(), reg.pending.len());
        reg.table.kinds.insert(qualified.clone(), EntityKind::Constant);
        reg.pending.push(Pending {
            name: qualified,
            kind: EntityKind::Constant,
            visibility: Visibility::Public,
            doc: node.doc.clone(),
            source: PendingSource::Macro(literal),
        });
    }
}

fn visibility_of(name: &QualifiedName, internal_linkage: bool) -> Visibility {
    if internal_linkage || name.in_anonymous_scope() {
        Visibility::Internal
    } else {
        Visibility::Public
    }
}

fn record_definition(source: &PendingSource<'_>) -> Option<bool> {
    match source {
        PendingSource::Node(node) => match &node.decl {
            DeclSyntax::Record(record) => Some(record.is_definition),
            _ => None,
        },
        _ => None,
    }
}

/// A definition replaces an earlier forward declaration of the same record.
fn merge_record<'a>(
    existing: &Pending<'a>,
    node: &'a SyntaxNode,
    kind: EntityKind,
) -> Option<PendingSource<'a>> {
    let existing_is_definition = record_definition(&existing.source)?;
    let DeclSyntax::Record(record) = &node.decl else {
        return None;
    };
    if !existing_is_definition && record.is_definition && matches!(kind, EntityKind::Struct | EntityKind::Class) {
        Some(PendingSource::Node(node))
    } else {
        None
    }
}

fn is_redundant_forward(existing: &Pending<'_>, node: &SyntaxNode) -> bool {
    match (&node.decl, record_definition(&existing.source)) {
        (DeclSyntax::Record(record), Some(_)) => !record.is_definition,
        _ => false,
    }
}

/// Expressions such as `CONST_2 * 2` cannot be evaluated without a compiler.
fn is_literal_initializer(initializer: &Initializer) -> bool {
    match initializer {
        Initializer::Scalar(token) => parse_literal(token).is_some(),
        Initializer::List(tokens) => parse_literal_list(tokens).is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RecordTag;
    use crate::syntax::{RecordSyntax, TypeSpec};

    #[test]
    fn test_scopes_open_implicit_namespaces() {
        let config = Config::default();
        let nodes = vec![SyntaxNode::typedef(&["outer", "inner"], "IntType", TypeSpec::new("int"))];
        let reg = Registry::new(&config).register(&nodes);
        assert!(reg.errors.is_empty());
        assert_eq!(reg.table.kind_of(&QualifiedName::parse("outer")), Some(EntityKind::Namespace));
        assert_eq!(reg.table.kind_of(&QualifiedName::parse("outer::inner")), Some(EntityKind::Namespace));
        assert_eq!(
            reg.table.kind_of(&QualifiedName::parse("outer::inner::IntType")),
            Some(EntityKind::TypedefAlias)
        );
    }

    #[test]
    fn test_non_const_variable_is_skipped() {
        let config = Config::default();
        let nodes = vec![SyntaxNode::variable(&["ns", "bar"], "n", TypeSpec::new("int"), Some("3"))];
        let reg = Registry::new(&config).register(&nodes);
        assert_eq!(reg.skipped.len(), 1);
        assert_eq!(reg.skipped[0].name.to_string(), "ns::bar::n");
        assert!(!reg.table.contains(&QualifiedName::parse("ns::bar::n")));
    }

    #[test]
    fn test_forward_declaration_then_definition() {
        let config = Config::default();
        let nodes = vec![
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "C2").forward()),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "C2").field("x", TypeSpec::new("int"))),
            SyntaxNode::record(&[], RecordSyntax::new(RecordTag::Class, "C2").forward()),
        ];
        let reg = Registry::new(&config).register(&nodes);
        assert!(reg.errors.is_empty());
        assert_eq!(reg.pending.len(), 1);
        assert_eq!(record_definition(&reg.pending[0].source), Some(true));
    }

    #[test]
    fn test_duplicate_definition() {
        let config = Config::default();
        let nodes = vec![
            SyntaxNode::function(&[], "f", TypeSpec::void(), vec![]),
            SyntaxNode::function(&[], "f", TypeSpec::void(), vec![TypeSpec::new("int")]),
        ];
        let reg = Registry::new(&config).register(&nodes);
        assert_eq!(reg.errors, vec![ModelError::Duplicate("f".into())]);
    }

    #[test]
    fn test_reserved_and_non_literal_macros() {
        let config = Config::default();
        let nodes = vec![
            SyntaxNode::macro_def("_FOR_TEST_HPP_", "1"),
            SyntaxNode::macro_def("DEFINE_1", "'1'"),
            SyntaxNode::macro_def("TWICE", "(x) * 2"),
        ];
        let reg = Registry::new(&config).register(&nodes);
        assert_eq!(reg.pending.len(), 1);
        assert_eq!(reg.pending[0].name.to_string(), "DEFINE_1");
        assert_eq!(reg.skipped.len(), 1);
    }

    #[test]
    fn test_anonymous_namespace_is_internal() {
        let config = Config::default();
        let nodes = vec![SyntaxNode::function(&["ns", ""], "helper", TypeSpec::void(), vec![])];
        let reg = Registry::new(&config).register(&nodes);
        let helper = reg.pending.iter().find(|p| p.name.name() == "helper").unwrap();
        assert_eq!(helper.visibility, Visibility::Internal);
    }
}
