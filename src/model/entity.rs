// Fri Jan 16 2026 - Alex

use crate::model::{Constant, PrimitiveType, QualifiedName, Record, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    /// Unnamed-namespace or internal-linkage declaration; never diffed.
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Namespace,
    TypedefAlias,
    Enum,
    Constant,
    Struct,
    Class,
    Function,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntityKind::Namespace => "namespace",
            EntityKind::TypedefAlias => "typedef",
            EntityKind::Enum => "enum",
            EntityKind::Constant => "constant",
            EntityKind::Struct => "struct",
            EntityKind::Class => "class",
            EntityKind::Function => "function",
        };
        f.write_str(s)
    }
}

/// Alias collapsed to its canonical target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedefAlias {
    pub target: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: String,
    pub value: i128,
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    pub underlying: PrimitiveType,
    pub members: Vec<Enumerator>,
}

impl Enumeration {
    pub fn member(&self, name: &str) -> Option<&Enumerator> {
        self.members.iter().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: Option<String>,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub ret: TypeRef,
    pub params: Vec<Param>,
}

impl Function {
    pub fn param_types(&self) -> Vec<&TypeRef> {
        self.params.iter().map(|p| &p.ty).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityBody {
    Namespace,
    TypedefAlias(TypedefAlias),
    Enum(Enumeration),
    Constant(Constant),
    Struct(Record),
    Class(Record),
    Function(Function),
}

/// One declared entity of a version's public surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: QualifiedName,
    pub visibility: Visibility,
    pub doc: Option<String>,
    pub body: EntityBody,
}

impl Entity {
    pub fn new(name: QualifiedName, body: EntityBody) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            doc: None,
            body,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self.body {
            EntityBody::Namespace => EntityKind::Namespace,
            EntityBody::TypedefAlias(_) => EntityKind::TypedefAlias,
            EntityBody::Enum(_) => EntityKind::Enum,
            EntityBody::Constant(_) => EntityKind::Constant,
            EntityBody::Struct(_) => EntityKind::Struct,
            EntityBody::Class(_) => EntityKind::Class,
            EntityBody::Function(_) => EntityKind::Function,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Type references held directly by this entity.
    pub fn type_refs(&self) -> Vec<&TypeRef> {
        let mut refs = Vec::new();
        match &self.body {
            EntityBody::TypedefAlias(alias) => refs.push(&alias.target),
            EntityBody::Constant(constant) => refs.push(&constant.ty),
            EntityBody::Function(function) => {
                refs.push(&function.ret);
                refs.extend(function.params.iter().map(|p| &p.ty));
            }
            EntityBody::Struct(record) | EntityBody::Class(record) => {
                refs.extend(record.fields.iter().map(|f| &f.ty));
                for method in &record.methods {
                    refs.push(&method.ret);
                    refs.extend(method.params.iter());
                }
            }
            EntityBody::Namespace | EntityBody::Enum(_) => {}
        }
        refs
    }

    pub fn as_record(&self) -> Option<&Record> {
        match &self.body {
            EntityBody::Struct(record) | EntityBody::Class(record) => Some(record),
            _ => None,
        }
    }

    /// Whether the entity can appear as the base of a [`TypeRef`].
    pub fn is_type(&self) -> bool {
        matches!(
            self.body,
            EntityBody::TypedefAlias(_)
                | EntityBody::Enum(_)
                | EntityBody::Struct(_)
                | EntityBody::Class(_)
        )
    }
}
