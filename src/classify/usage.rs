// Mon Jan 19 2026 - Alex

use crate::model::{DeclarationModel, QualifiedName};
use std::collections::HashSet;

/// How the types of a version pair are used by the rest of their headers.
///
/// Built from both versions so a use that appears or disappears between
/// them still counts.
#[derive(Debug, Clone, Default)]
pub struct UsageContext {
    subclassed: HashSet<QualifiedName>,
    by_value: HashSet<QualifiedName>,
    indirect: HashSet<QualifiedName>,
}

impl UsageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_models(models: &[&DeclarationModel]) -> Self {
        let mut context = Self::new();
        for model in models {
            context.add_model(model);
        }
        context
    }

    /// Only public entities count; uses from internal helpers are invisible
    /// to clients.
    pub fn add_model(&mut self, model: &DeclarationModel) {
        for record in model.public_entities().filter_map(|e| e.as_record()) {
            if let Some(base) = &record.base {
                self.subclassed.insert(base.clone());
            }
        }
        for ty in model.public_type_refs() {
            let Some(name) = ty.referenced_name() else {
                continue;
            };
            if ty.is_by_value() {
                self.by_value.insert(name.clone());
            } else {
                self.indirect.insert(name.clone());
            }
        }
    }

    pub fn has_subclasses(&self, name: &QualifiedName) -> bool {
        self.subclassed.contains(name)
    }

    pub fn used_by_value(&self, name: &QualifiedName) -> bool {
        self.by_value.contains(name)
    }

    /// Reached only through pointers or references, and never derived from.
    pub fn is_handle_only(&self, name: &QualifiedName) -> bool {
        self.indirect.contains(name) && !self.by_value.contains(name) && !self.subclassed.contains(name)
    }
}
