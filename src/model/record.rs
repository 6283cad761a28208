// Fri Jan 16 2026 - Alex

use crate::model::{QualifiedName, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTag {
    Struct,
    Class,
}

impl fmt::Display for RecordTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTag::Struct => write!(f, "struct"),
            RecordTag::Class => write!(f, "class"),
        }
    }
}

/// A data member. Declared order determines its offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
}

impl Field {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    NonVirtual,
    Virtual,
    PureVirtual,
    Static,
}

impl MethodKind {
    pub fn is_virtual(self) -> bool {
        matches!(self, MethodKind::Virtual | MethodKind::PureVirtual)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::NonVirtual => write!(f, "non-virtual"),
            MethodKind::Virtual => write!(f, "virtual"),
            MethodKind::PureVirtual => write!(f, "pure virtual"),
            MethodKind::Static => write!(f, "static"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodRole {
    Ordinary,
    Constructor,
    Destructor,
}

/// Name, parameter types and const-ness of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<String>,
    pub is_const: bool,
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.params.join(", "))?;
        if self.is_const {
            write!(f, " const")?;
        }
        Ok(())
    }
}

/// Key under which a virtual method claims a vtable slot.
///
/// Destructors of every class in a chain share one key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "signature", rename_all = "snake_case")]
pub enum SlotKey {
    Destructor,
    Method(MethodSignature),
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Destructor => write!(f, "~()"),
            SlotKey::Method(sig) => write!(f, "{}", sig),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    pub ret: TypeRef,
    pub params: Vec<TypeRef>,
    pub kind: MethodKind,
    pub role: MethodRole,
    pub is_const: bool,
    /// Base class whose virtual this method overrides.
    pub overrides: Option<QualifiedName>,
}

impl Method {
    pub fn new(name: &str, ret: TypeRef, kind: MethodKind) -> Self {
        Self {
            name: name.to_string(),
            ret,
            params: Vec::new(),
            kind,
            role: MethodRole::Ordinary,
            is_const: false,
            overrides: None,
        }
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            name: self.name.clone(),
            params: self.params.iter().map(|p| p.to_string()).collect(),
            is_const: self.is_const,
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        match self.role {
            MethodRole::Destructor => SlotKey::Destructor,
            _ => SlotKey::Method(self.signature()),
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.kind.is_virtual()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MethodKind::Static => write!(f, "static ")?,
            MethodKind::Virtual | MethodKind::PureVirtual => write!(f, "virtual ")?,
            MethodKind::NonVirtual => {}
        }
        if self.role == MethodRole::Ordinary {
            write!(f, "{} ", self.ret)?;
        }
        write!(f, "{}", self.signature())?;
        if self.kind == MethodKind::PureVirtual {
            write!(f, " = 0")?;
        }
        Ok(())
    }
}

/// A struct or class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub tag: RecordTag,
    pub base: Option<QualifiedName>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    /// False for a forward declaration that never received a definition.
    pub is_complete: bool,
}

impl Record {
    pub fn new(tag: RecordTag) -> Self {
        Self {
            tag,
            base: None,
            fields: Vec::new(),
            methods: Vec::new(),
            is_complete: true,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn virtual_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_virtual())
    }

    pub fn declares_virtuals(&self) -> bool {
        self.methods.iter().any(Method::is_virtual)
    }

    pub fn is_abstract(&self) -> bool {
        self.methods.iter().any(|m| m.kind == MethodKind::PureVirtual)
    }
}
