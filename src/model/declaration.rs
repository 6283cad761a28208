// Fri Jan 16 2026 - Alex

use crate::model::{Entity, QualifiedName, Record, TypeBase, TypeRef};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A declaration the builder saw but kept out of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDeclaration {
    pub name: QualifiedName,
    pub reason: String,
}

/// Symbolic model of one source version.
///
/// Entities keep their declaration order; lookups are by qualified name.
/// Built once by [`ModelBuilder`](crate::builder::ModelBuilder) and never
/// mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationModel {
    label: String,
    entities: IndexMap<QualifiedName, Entity>,
    skipped: Vec<SkippedDeclaration>,
}

impl DeclarationModel {
    pub(crate) fn new(
        label: &str,
        entities: IndexMap<QualifiedName, Entity>,
        skipped: Vec<SkippedDeclaration>,
    ) -> Self {
        Self {
            label: label.to_string(),
            entities,
            skipped,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, name: &QualifiedName) -> Option<&Entity> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &QualifiedName) -> bool {
        self.entities.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn public_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.is_public())
    }

    pub fn skipped(&self) -> &[SkippedDeclaration] {
        &self.skipped
    }

    pub fn record(&self, name: &QualifiedName) -> Option<&Record> {
        self.entities.get(name).and_then(Entity::as_record)
    }

    pub fn records(&self) -> impl Iterator<Item = (&QualifiedName, &Record)> {
        self.entities
            .iter()
            .filter_map(|(name, entity)| entity.as_record().map(|r| (name, r)))
    }

    /// Every type reference held anywhere in the model.
    pub fn type_refs(&self) -> Vec<&TypeRef> {
        self.entities.values().flat_map(Entity::type_refs).collect()
    }

    /// Type references held by public entities only.
    pub fn public_type_refs(&self) -> Vec<&TypeRef> {
        self.public_entities().flat_map(Entity::type_refs).collect()
    }

    /// True when `ty` names a built-in or a type entity of this model.
    pub fn resolves(&self, ty: &TypeRef) -> bool {
        match &ty.base {
            TypeBase::Primitive(_) => true,
            TypeBase::Named(name) => self.get(name).map(Entity::is_type).unwrap_or(false),
        }
    }
}
