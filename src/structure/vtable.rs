// Tue Jan 15 2026 - Alex

use crate::model::{Method, MethodKind, QualifiedName, SlotKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of a slot across versions: the slot key plus, for destructors
/// that take several slots, which of them.
pub type SlotId = (SlotKey, u8);

/// Represents a single entry in a virtual table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VTableEntry {
    /// Index in the vtable (0-based)
    pub index: usize,
    pub key: SlotKey,
    /// Distinguishes the complete/deleting destructor pair.
    pub variant: u8,
    /// The class whose declaration first claimed this slot
    pub declaring_class: QualifiedName,
    /// The most-derived class providing the entry
    pub implementing_class: QualifiedName,
    /// Pure virtual: the slot is reserved but has no callable target
    pub is_pure: bool,
}

impl VTableEntry {
    pub fn id(&self) -> SlotId {
        (self.key.clone(), self.variant)
    }

    pub fn is_override(&self) -> bool {
        self.declaring_class != self.implementing_class
    }
}

impl fmt::Display for VTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.index, self.key)?;
        if self.key == SlotKey::Destructor && self.variant > 0 {
            write!(f, " #{}", self.variant)?;
        }
        if self.is_pure {
            write!(f, " = 0")?;
        }
        if self.is_override() {
            write!(f, " [override in {}]", self.implementing_class)?;
        }
        Ok(())
    }
}

/// Slot list of one polymorphic record, base slots first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VTable {
    pub class_name: QualifiedName,
    pub entries: Vec<VTableEntry>,
}

impl VTable {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn get_entry(&self, index: usize) -> Option<&VTableEntry> {
        self.entries.get(index)
    }

    pub fn find(&self, id: &SlotId) -> Option<&VTableEntry> {
        self.entries.iter().find(|e| e.id() == *id)
    }

    pub fn override_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_override()).count()
    }

    pub fn is_abstract(&self) -> bool {
        self.entries.iter().any(|e| e.is_pure)
    }
}

impl fmt::Display for VTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VTable for {}", self.class_name)?;
        writeln!(f, "  Entries: {}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(f, "  {}", entry)?;
        }
        Ok(())
    }
}

/// Derives a record's vtable from its base's table and its own virtuals.
pub struct VTableBuilder {
    class_name: QualifiedName,
    entries: Vec<VTableEntry>,
    destructor_slots: u8,
}

impl VTableBuilder {
    pub fn new(class_name: &QualifiedName, destructor_slots: u8) -> Self {
        Self {
            class_name: class_name.clone(),
            entries: Vec::new(),
            destructor_slots: destructor_slots.max(1),
        }
    }

    /// Starts from a copy of the base table; every inherited slot keeps its index.
    pub fn with_base(mut self, base: &VTable) -> Self {
        self.entries = base.entries.clone();
        self
    }

    /// An override reuses every slot with the same key; anything else is
    /// appended in declaration order.
    pub fn add_method(mut self, method: &Method) -> Self {
        if !method.is_virtual() {
            return self;
        }
        let key = method.slot_key();
        let is_pure = method.kind == MethodKind::PureVirtual;
        let mut reused = false;
        for entry in self.entries.iter_mut().filter(|e| e.key == key) {
            entry.implementing_class = self.class_name.clone();
            entry.is_pure = is_pure;
            reused = true;
        }
        if reused {
            return self;
        }

        let variants = if key == SlotKey::Destructor { self.destructor_slots } else { 1 };
        for variant in 0..variants {
            self.entries.push(VTableEntry {
                index: self.entries.len(),
                key: key.clone(),
                variant,
                declaring_class: self.class_name.clone(),
                implementing_class: self.class_name.clone(),
                is_pure,
            });
        }
        self
    }

    pub fn build(self) -> VTable {
        VTable {
            class_name: self.class_name,
            entries: self.entries,
        }
    }
}

/// A single difference between the slot lists of two versions of one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VTableDifference {
    Added { index: usize, slot: SlotKey },
    Removed { index: usize, slot: SlotKey },
    Moved { slot: SlotKey, old_index: usize, new_index: usize },
}

impl fmt::Display for VTableDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VTableDifference::Added { index, slot } => write!(f, "[{}] Added: {}", index, slot),
            VTableDifference::Removed { index, slot } => write!(f, "[{}] Removed: {}", index, slot),
            VTableDifference::Moved {
                slot,
                old_index,
                new_index,
            } => write!(f, "{} moved: [{}] -> [{}]", slot, old_index, new_index),
        }
    }
}

/// Matches slots by identity and reports what was added, removed or moved.
/// A missing table counts as empty.
pub fn compare_vtables(old: Option<&VTable>, new: Option<&VTable>) -> Vec<VTableDifference> {
    let empty = Vec::new();
    let old_entries = old.map(|t| &t.entries).unwrap_or(&empty);
    let new_entries = new.map(|t| &t.entries).unwrap_or(&empty);
    let new_index: HashMap<SlotId, usize> = new_entries.iter().map(|e| (e.id(), e.index)).collect();
    let old_index: HashMap<SlotId, usize> = old_entries.iter().map(|e| (e.id(), e.index)).collect();

    let mut differences = Vec::new();
    for entry in old_entries {
        match new_index.get(&entry.id()) {
            None => differences.push(VTableDifference::Removed {
                index: entry.index,
                slot: entry.key.clone(),
            }),
            Some(&index) if index != entry.index => differences.push(VTableDifference::Moved {
                slot: entry.key.clone(),
                old_index: entry.index,
                new_index: index,
            }),
            Some(_) => {}
        }
    }
    for entry in new_entries {
        if !old_index.contains_key(&entry.id()) {
            differences.push(VTableDifference::Added {
                index: entry.index,
                slot: entry.key.clone(),
            });
        }
    }
    differences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodRole, TypeRef};

    fn virtual_method(name: &str, kind: MethodKind) -> Method {
        Method::new(name, TypeRef::primitive(crate::model::PrimitiveType::Int), kind)
    }

    #[test]
    fn test_override_reuses_base_slot() {
        let base_name = QualifiedName::parse("C2");
        let base = VTableBuilder::new(&base_name, 1)
            .add_method(&virtual_method("pure_virtual_method", MethodKind::PureVirtual))
            .add_method(&virtual_method("other", MethodKind::Virtual))
            .build();
        assert!(base.is_abstract());

        let derived = VTableBuilder::new(&QualifiedName::parse("D"), 1)
            .with_base(&base)
            .add_method(&virtual_method("extra", MethodKind::Virtual))
            .add_method(&virtual_method("pure_virtual_method", MethodKind::Virtual))
            .build();
        assert_eq!(derived.entry_count(), 3);
        assert_eq!(derived.entries[0].implementing_class, QualifiedName::parse("D"));
        assert_eq!(derived.entries[0].declaring_class, base_name);
        assert!(!derived.entries[0].is_pure);
        assert_eq!(derived.entries[2].index, 2);
        assert_eq!(derived.override_count(), 1);
    }

    #[test]
    fn test_destructor_slot_pair() {
        let mut dtor = Method::new("~C1", TypeRef::void(), MethodKind::Virtual);
        dtor.role = MethodRole::Destructor;
        let table = VTableBuilder::new(&QualifiedName::parse("C1"), 2).add_method(&dtor).build();
        assert_eq!(table.entry_count(), 2);
        assert_eq!(table.entries[1].variant, 1);
    }

    #[test]
    fn test_compare_reports_moves() {
        let name = QualifiedName::parse("C");
        let old = VTableBuilder::new(&name, 1)
            .add_method(&virtual_method("a", MethodKind::Virtual))
            .add_method(&virtual_method("b", MethodKind::Virtual))
            .build();
        let new = VTableBuilder::new(&name, 1)
            .add_method(&virtual_method("new_first", MethodKind::Virtual))
            .add_method(&virtual_method("a", MethodKind::Virtual))
            .add_method(&virtual_method("b", MethodKind::Virtual))
            .build();
        let diffs = compare_vtables(Some(&old), Some(&new));
        assert_eq!(diffs.len(), 3);
        assert!(matches!(diffs[0], VTableDifference::Moved { old_index: 0, new_index: 1, .. }));
        assert!(matches!(diffs[2], VTableDifference::Added { index: 0, .. }));
    }
}
