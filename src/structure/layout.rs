// Tue Jan 13 2026 - Alex

use crate::model::QualifiedName;
use crate::structure::{Alignment, FieldLayout, Size, VTable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout annotation of one struct or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLayout {
    pub name: QualifiedName,
    pub size: Size,
    pub alignment: Alignment,
    /// This record introduces the vtable pointer at offset 0.
    pub has_own_vptr: bool,
    /// Bytes occupied by the base subobject before the first own field.
    pub base_size: Size,
    /// Own fields only, in declared order; base fields live in the base layout.
    pub fields: Vec<FieldLayout>,
    pub vtable: Option<VTable>,
    /// No data and no vptr anywhere in the chain; occupies one padding byte.
    pub is_empty: bool,
}

impl RecordLayout {
    pub fn get_field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_polymorphic(&self) -> bool {
        self.vtable.is_some()
    }

    pub fn slot_count(&self) -> usize {
        self.vtable.as_ref().map(VTable::entry_count).unwrap_or(0)
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} (size {}, align {})", self.name, self.size, self.alignment)?;
        if self.has_own_vptr {
            writeln!(f, "  vptr @ 0")?;
        }
        if !self.base_size.is_zero() {
            writeln!(f, "  base subobject: {} bytes", self.base_size)?;
        }
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        if let Some(vtable) = &self.vtable {
            for entry in &vtable.entries {
                writeln!(f, "  slot {}", entry)?;
            }
        }
        Ok(())
    }
}
