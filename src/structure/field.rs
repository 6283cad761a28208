// Tue Jan 13 2026 - Alex

use crate::model::TypeRef;
use crate::structure::{Alignment, Offset, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placement of one declared field inside its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    pub name: String,
    pub ty: TypeRef,
    pub offset: Offset,
    pub size: Size,
    pub alignment: Alignment,
}

impl FieldLayout {
    pub fn end(&self) -> u64 {
        self.offset.as_u64() + self.size.as_u64()
    }
}

impl fmt::Display for FieldLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}: {} (size {}, align {})", self.name, self.offset, self.ty, self.size, self.alignment)
    }
}
