// Tue Jan 13 2026 - Alex

use crate::model::{
    Constant, DeclarationModel, Entity, EntityBody, Enumeration, Function, QualifiedName, Record, TypedefAlias,
};
use std::collections::HashMap;

/// Callbacks fired by [`walk`] over the public surface of one model.
///
/// Every callback defaults to doing nothing.
pub trait ModelVisitor {
    fn on_file_begin(&mut self, _header: &str) {}
    fn on_file_end(&mut self) {}
    fn on_namespace_begin(&mut self, _namespace: &QualifiedName) {}
    fn on_namespace_end(&mut self, _namespace: &QualifiedName) {}
    fn on_typedef(&mut self, _entity: &Entity, _alias: &TypedefAlias) {}
    fn on_enum(&mut self, _entity: &Entity, _enumeration: &Enumeration) {}
    fn on_constant(&mut self, _entity: &Entity, _constant: &Constant) {}
    fn on_record(&mut self, _entity: &Entity, _record: &Record) {}
    fn on_function(&mut self, _entity: &Entity, _function: &Function) {}
}

/// Visits public entities in declaration order, descending into each
/// namespace where it is first declared. Internal entities and everything
/// nested under them are skipped.
pub fn walk<V: ModelVisitor + ?Sized>(model: &DeclarationModel, header: &str, visitor: &mut V) {
    let mut children: HashMap<Vec<String>, Vec<&Entity>> = HashMap::new();
    for entity in model.public_entities() {
        children
            .entry(entity.name.scope().to_vec())
            .or_default()
            .push(entity);
    }

    visitor.on_file_begin(header);
    walk_scope(&children, &[], visitor);
    visitor.on_file_end();
}

fn walk_scope<V: ModelVisitor + ?Sized>(
    children: &HashMap<Vec<String>, Vec<&Entity>>,
    scope: &[String],
    visitor: &mut V,
) {
    let Some(entities) = children.get(scope) else {
        return;
    };
    for entity in entities {
        match &entity.body {
            EntityBody::Namespace => {
                visitor.on_namespace_begin(&entity.name);
                walk_scope(children, &entity.name.as_scope(), visitor);
                visitor.on_namespace_end(&entity.name);
            }
            EntityBody::TypedefAlias(alias) => visitor.on_typedef(entity, alias),
            EntityBody::Enum(enumeration) => visitor.on_enum(entity, enumeration),
            EntityBody::Constant(constant) => visitor.on_constant(entity, constant),
            EntityBody::Struct(record) | EntityBody::Class(record) => visitor.on_record(entity, record),
            EntityBody::Function(function) => visitor.on_function(entity, function),
        }
    }
}

/// Fans every callback out to several visitors in order.
#[derive(Default)]
pub struct VisitorGroup<'a> {
    visitors: Vec<&'a mut dyn ModelVisitor>,
}

impl<'a> VisitorGroup<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, visitor: &'a mut dyn ModelVisitor) -> Self {
        self.visitors.push(visitor);
        self
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }
}

impl ModelVisitor for VisitorGroup<'_> {
    fn on_file_begin(&mut self, header: &str) {
        self.visitors.iter_mut().for_each(|v| v.on_file_begin(header));
    }

    fn on_file_end(&mut self) {
        self.visitors.iter_mut().for_each(|v| v.on_file_end());
    }

    fn on_namespace_begin(&mut self, namespace: &QualifiedName) {
        self.visitors.iter_mut().for_each(|v| v.on_namespace_begin(namespace));
    }

    fn on_namespace_end(&mut self, namespace: &QualifiedName) {
        self.visitors.iter_mut().for_each(|v| v.on_namespace_end(namespace));
    }

    fn on_typedef(&mut self, entity: &Entity, alias: &TypedefAlias) {
        self.visitors.iter_mut().for_each(|v| v.on_typedef(entity, alias));
    }

    fn on_enum(&mut self, entity: &Entity, enumeration: &Enumeration) {
        self.visitors.iter_mut().for_each(|v| v.on_enum(entity, enumeration));
    }

    fn on_constant(&mut self, entity: &Entity, constant: &Constant) {
        self.visitors.iter_mut().for_each(|v| v.on_constant(entity, constant));
    }

    fn on_record(&mut self, entity: &Entity, record: &Record) {
        self.visitors.iter_mut().for_each(|v| v.on_record(entity, record));
    }

    fn on_function(&mut self, entity: &Entity, function: &Function) {
        self.visitors.iter_mut().for_each(|v| v.on_function(entity, function));
    }
}
