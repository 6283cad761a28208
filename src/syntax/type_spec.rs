// Sat Jan 17 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type as written at a use site, before name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeSpec {
    pub base: String,
    #[serde(default)]
    pub pointer_depth: u8,
    #[serde(default)]
    pub is_reference: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_volatile: bool,
    #[serde(default)]
    pub array_extent: u64,
}

impl TypeSpec {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.to_string(),
            pointer_depth: 0,
            is_reference: false,
            is_const: false,
            is_volatile: false,
            array_extent: 0,
        }
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    pub fn pointer(mut self, depth: u8) -> Self {
        self.pointer_depth = depth;
        self
    }

    pub fn reference(mut self) -> Self {
        self.is_reference = true;
        self
    }

    pub fn constant(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn array(mut self, extent: u64) -> Self {
        self.array_extent = extent;
        self
    }

    pub fn is_indirect(&self) -> bool {
        self.pointer_depth > 0 || self.is_reference
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}{}", self.base, "*".repeat(self.pointer_depth as usize))?;
        if self.is_reference {
            write!(f, "&")?;
        }
        if self.array_extent > 0 {
            write!(f, "[{}]", self.array_extent)?;
        }
        Ok(())
    }
}
