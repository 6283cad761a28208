// Tue Jan 15 2026 - Alex

use crate::model::{
    ConstantValue, EntityKind, MethodKind, MethodSignature, PrimitiveType, QualifiedName, RecordTag, SlotKey,
    TypeRef,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Modified => write!(f, "modified"),
        }
    }
}

/// One structural delta inside a modified entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum ChangeDetail {
    KindChanged { old: EntityKind, new: EntityKind },
    AliasTargetChanged { old: TypeRef, new: TypeRef },

    EnumMemberAdded { name: String, value: i128 },
    EnumMemberRemoved { name: String, value: i128 },
    EnumValueChanged { name: String, old: i128, new: i128 },
    EnumUnderlyingChanged { old: PrimitiveType, new: PrimitiveType },

    ConstantTypeChanged { old: TypeRef, new: TypeRef },
    ConstantValueChanged { old: ConstantValue, new: ConstantValue },

    FunctionReturnChanged { old: TypeRef, new: TypeRef },
    FunctionParamsChanged { old: Vec<TypeRef>, new: Vec<TypeRef> },

    /// `trailing`: no field present in both versions follows it.
    FieldAdded { name: String, ty: TypeRef, index: usize, trailing: bool },
    FieldRemoved { name: String, ty: TypeRef, index: usize },
    /// Fields present in both versions appear in a different relative order.
    FieldsReordered { old: Vec<String>, new: Vec<String> },
    FieldTypeChanged { name: String, old: TypeRef, new: TypeRef },

    MethodAdded { signature: MethodSignature, kind: MethodKind },
    MethodRemoved { signature: MethodSignature, kind: MethodKind },
    MethodSignatureChanged { old: MethodSignature, new: MethodSignature },
    MethodReturnChanged { signature: MethodSignature, old: TypeRef, new: TypeRef },
    MethodKindChanged { signature: MethodSignature, old: MethodKind, new: MethodKind },
    MethodsReordered { old: Vec<String>, new: Vec<String> },

    BaseChanged { old: Option<QualifiedName>, new: Option<QualifiedName> },
    /// `struct` became `class` or back; members are compared as usual.
    RecordTagChanged { old: RecordTag, new: RecordTag },

    SizeChanged { old: u64, new: u64 },
    AlignmentChanged { old: u64, new: u64 },
    FieldOffsetChanged { name: String, old: u64, new: u64 },
    /// `old_count`: slots in the old table, so `index >= old_count` is an append.
    VTableSlotAdded { slot: SlotKey, index: usize, old_count: usize },
    VTableSlotRemoved { slot: SlotKey, index: usize },
    VTableSlotMoved { slot: SlotKey, old_index: usize, new_index: usize },
    VptrChanged { old: bool, new: bool },
    /// Layout could not be computed for at least one side.
    LayoutUnavailable { reason: String },
}

impl ChangeDetail {
    /// Derived from the two layout annotations rather than the declarations.
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            ChangeDetail::SizeChanged { .. }
                | ChangeDetail::AlignmentChanged { .. }
                | ChangeDetail::FieldOffsetChanged { .. }
                | ChangeDetail::VTableSlotAdded { .. }
                | ChangeDetail::VTableSlotRemoved { .. }
                | ChangeDetail::VTableSlotMoved { .. }
                | ChangeDetail::VptrChanged { .. }
                | ChangeDetail::LayoutUnavailable { .. }
        )
    }
}

fn type_list(types: &[TypeRef]) -> String {
    types.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for ChangeDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ChangeDetail::*;
        match self {
            KindChanged { old, new } => write!(f, "kind changed from {} to {}", old, new),
            AliasTargetChanged { old, new } => write!(f, "alias target {} -> {}", old, new),
            EnumMemberAdded { name, value } => write!(f, "enumerator {} = {} added", name, value),
            EnumMemberRemoved { name, value } => write!(f, "enumerator {} = {} removed", name, value),
            EnumValueChanged { name, old, new } => write!(f, "enumerator {} value {} -> {}", name, old, new),
            EnumUnderlyingChanged { old, new } => write!(f, "underlying type {} -> {}", old, new),
            ConstantTypeChanged { old, new } => write!(f, "type {} -> {}", old, new),
            ConstantValueChanged { old, new } => write!(f, "value {} -> {}", old, new),
            FunctionReturnChanged { old, new } => write!(f, "return type {} -> {}", old, new),
            FunctionParamsChanged { old, new } => {
                write!(f, "parameters ({}) -> ({})", type_list(old), type_list(new))
            }
            FieldAdded { name, ty, index, trailing } => {
                let position = if *trailing { "at the end" } else { "in the middle" };
                write!(f, "field {}: {} added at #{} ({})", name, ty, index, position)
            }
            FieldRemoved { name, ty, index } => write!(f, "field {}: {} removed from #{}", name, ty, index),
            FieldsReordered { old, new } => write!(f, "fields reordered [{}] -> [{}]", old.join(", "), new.join(", ")),
            FieldTypeChanged { name, old, new } => write!(f, "field {} type {} -> {}", name, old, new),
            MethodAdded { signature, kind } => write!(f, "{} method {} added", kind, signature),
            MethodRemoved { signature, kind } => write!(f, "{} method {} removed", kind, signature),
            MethodSignatureChanged { old, new } => write!(f, "method {} became {}", old, new),
            MethodReturnChanged { signature, old, new } => {
                write!(f, "method {} return type {} -> {}", signature, old, new)
            }
            MethodKindChanged { signature, old, new } => write!(f, "method {} {} -> {}", signature, old, new),
            MethodsReordered { old, new } => {
                write!(f, "methods reordered [{}] -> [{}]", old.join(", "), new.join(", "))
            }
            BaseChanged { old, new } => {
                let show = |b: &Option<QualifiedName>| b.as_ref().map(|n| n.to_string()).unwrap_or_else(|| "none".into());
                write!(f, "base class {} -> {}", show(old), show(new))
            }
            RecordTagChanged { old, new } => write!(f, "declared as {} instead of {}", new, old),
            SizeChanged { old, new } => write!(f, "size {} -> {}", old, new),
            AlignmentChanged { old, new } => write!(f, "alignment {} -> {}", old, new),
            FieldOffsetChanged { name, old, new } => write!(f, "field {} offset {} -> {}", name, old, new),
            VTableSlotAdded { slot, index, .. } => write!(f, "vtable slot [{}] {} added", index, slot),
            VTableSlotRemoved { slot, index } => write!(f, "vtable slot [{}] {} removed", index, slot),
            VTableSlotMoved {
                slot,
                old_index,
                new_index,
            } => write!(f, "vtable slot {} moved [{}] -> [{}]", slot, old_index, new_index),
            VptrChanged { old, new } => write!(f, "polymorphic {} -> {}", old, new),
            LayoutUnavailable { reason } => write!(f, "layout unavailable: {}", reason),
        }
    }
}

/// Everything that happened to one entity between two versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub name: QualifiedName,
    pub entity_kind: EntityKind,
    pub details: Vec<ChangeDetail>,
}

impl Change {
    pub fn added(name: &QualifiedName, entity_kind: EntityKind) -> Self {
        Self {
            kind: ChangeKind::Added,
            name: name.clone(),
            entity_kind,
            details: Vec::new(),
        }
    }

    pub fn removed(name: &QualifiedName, entity_kind: EntityKind) -> Self {
        Self {
            kind: ChangeKind::Removed,
            name: name.clone(),
            entity_kind,
            details: Vec::new(),
        }
    }

    pub fn modified(name: &QualifiedName, entity_kind: EntityKind, details: Vec<ChangeDetail>) -> Self {
        Self {
            kind: ChangeKind::Modified,
            name: name.clone(),
            entity_kind,
            details,
        }
    }

    pub fn has_detail(&self, predicate: impl Fn(&ChangeDetail) -> bool) -> bool {
        self.details.iter().any(predicate)
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.kind, self.entity_kind, self.name)
    }
}
