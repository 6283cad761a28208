// Fri Jan 16 2026 - Alex

use crate::model::{PrimitiveType, QualifiedName};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// cv-qualifiers on the outermost written type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Qualifiers: u8 {
        const CONST = 0b01;
        const VOLATILE = 0b10;
    }
}

/// What a [`TypeRef`] ultimately names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum TypeBase {
    Primitive(PrimitiveType),
    /// Non-owning reference to an entity of the same model.
    Named(QualifiedName),
}

/// Non-owning, fully resolved reference to a type.
///
/// `array_extent` applies to the element described by the rest of the
/// fields: `char[7]` is `{ Char, depth 0, extent 7 }` and `S1*[2]` is
/// `{ S1, depth 1, extent 2 }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub base: TypeBase,
    pub pointer_depth: u8,
    pub is_reference: bool,
    pub qualifiers: Qualifiers,
    pub array_extent: u64,
}

impl TypeRef {
    pub fn new(base: TypeBase) -> Self {
        Self {
            base,
            pointer_depth: 0,
            is_reference: false,
            qualifiers: Qualifiers::empty(),
            array_extent: 0,
        }
    }

    pub fn primitive(ty: PrimitiveType) -> Self {
        Self::new(TypeBase::Primitive(ty))
    }

    pub fn named(name: QualifiedName) -> Self {
        Self::new(TypeBase::Named(name))
    }

    pub fn void() -> Self {
        Self::primitive(PrimitiveType::Void)
    }

    pub fn with_pointer(mut self, depth: u8) -> Self {
        self.pointer_depth = depth;
        self
    }

    pub fn with_reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn with_const(mut self) -> Self {
        self.qualifiers |= Qualifiers::CONST;
        self
    }

    pub fn with_extent(mut self, extent: u64) -> Self {
        self.array_extent = extent;
        self
    }

    pub fn is_const(&self) -> bool {
        self.qualifiers.contains(Qualifiers::CONST)
    }

    pub fn is_array(&self) -> bool {
        self.array_extent > 0
    }

    /// True when the storage is the referenced type itself rather than an indirection.
    pub fn is_by_value(&self) -> bool {
        self.pointer_depth == 0 && !self.is_reference
    }

    pub fn referenced_name(&self) -> Option<&QualifiedName> {
        match &self.base {
            TypeBase::Named(name) => Some(name),
            TypeBase::Primitive(_) => None,
        }
    }

    /// The named type this reference embeds by value, if any.
    pub fn embedded_name(&self) -> Option<&QualifiedName> {
        if self.is_by_value() {
            self.referenced_name()
        } else {
            None
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self.base {
            TypeBase::Primitive(ty) => Some(ty),
            TypeBase::Named(_) => None,
        }
    }
}

impl fmt::Display for TypeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeBase::Primitive(ty) => write!(f, "{}", ty),
            TypeBase::Named(name) => write!(f, "{}", name),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const() {
            write!(f, "const ")?;
        }
        if self.qualifiers.contains(Qualifiers::VOLATILE) {
            write!(f, "volatile ")?;
        }
        write!(f, "{}", self.base)?;
        for _ in 0..self.pointer_depth {
            write!(f, "*")?;
        }
        if self.is_reference {
            write!(f, "&")?;
        }
        if self.array_extent > 0 {
            write!(f, "[{}]", self.array_extent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let ty = TypeRef::primitive(PrimitiveType::Char).with_const().with_pointer(1);
        assert_eq!(ty.to_string(), "const char*");

        let ty = TypeRef::primitive(PrimitiveType::Char).with_extent(7);
        assert_eq!(ty.to_string(), "char[7]");

        let ty = TypeRef::named(QualifiedName::parse("ns::S1")).with_reference();
        assert_eq!(ty.to_string(), "ns::S1&");
    }

    #[test]
    fn test_embedded_name_ignores_indirection() {
        let name = QualifiedName::parse("ns::C2");
        assert_eq!(TypeRef::named(name.clone()).embedded_name(), Some(&name));
        assert_eq!(TypeRef::named(name.clone()).with_pointer(1).embedded_name(), None);
        assert_eq!(TypeRef::named(name).with_reference().embedded_name(), None);
    }
}
