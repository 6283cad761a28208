// Mon Jan 19 2026 - Alex

//! Fixed policy table mapping change details to verdicts.

use crate::classify::{UsageContext, Verdict};
use crate::diff::{Change, ChangeDetail, ChangeKind};
use crate::model::MethodKind;

/// Verdict of one whole change: the worst verdict among its details.
pub fn change_verdict(change: &Change, usage: &UsageContext) -> Verdict {
    match change.kind {
        ChangeKind::Added => Verdict::Compatible,
        ChangeKind::Removed => Verdict::SourceBreaking,
        ChangeKind::Modified => {
            let grows_handle = usage.is_handle_only(&change.name) && only_trailing_growth(change);
            change
                .details
                .iter()
                .map(|detail| detail_verdict(detail, grows_handle))
                .max()
                .unwrap_or(Verdict::Compatible)
        }
    }
}

/// Trailing field additions and the size/alignment shift they cause, nothing else.
fn only_trailing_growth(change: &Change) -> bool {
    change.has_detail(|d| matches!(d, ChangeDetail::FieldAdded { trailing: true, .. }))
        && change.details.iter().all(|d| {
            matches!(
                d,
                ChangeDetail::FieldAdded { trailing: true, .. }
                    | ChangeDetail::SizeChanged { .. }
                    | ChangeDetail::AlignmentChanged { .. }
            )
        })
}

/// `grows_handle`: the entity is only handled through indirection and the
/// change only appends fields.
pub fn detail_verdict(detail: &ChangeDetail, grows_handle: bool) -> Verdict {
    use ChangeDetail::*;
    match detail {
        KindChanged { .. } => Verdict::SourceBreaking,
        AliasTargetChanged { .. } => Verdict::BinaryBreaking,

        EnumMemberAdded { .. } => Verdict::Compatible,
        EnumMemberRemoved { .. } => Verdict::SourceBreaking,
        EnumValueChanged { .. } | EnumUnderlyingChanged { .. } => Verdict::BinaryBreaking,

        ConstantTypeChanged { .. } | ConstantValueChanged { .. } => Verdict::BinaryBreaking,

        FunctionReturnChanged { .. } | FunctionParamsChanged { .. } => Verdict::SourceBreaking,

        FieldAdded { trailing: true, .. } if grows_handle => Verdict::Compatible,
        FieldAdded { .. } | FieldsReordered { .. } | FieldTypeChanged { .. } => Verdict::BinaryBreaking,
        FieldRemoved { .. } => Verdict::SourceBreaking,

        MethodAdded { .. } | MethodsReordered { .. } => Verdict::Compatible,
        MethodRemoved { .. } | MethodSignatureChanged { .. } | MethodReturnChanged { .. } => Verdict::SourceBreaking,
        MethodKindChanged { old, new, .. } => method_kind_verdict(*old, *new),

        BaseChanged { old: None, new: Some(_) } => Verdict::BinaryBreaking,
        BaseChanged { .. } => Verdict::SourceBreaking,
        // the tag is part of the mangled name on some targets
        RecordTagChanged { .. } => Verdict::BinaryBreaking,

        SizeChanged { .. } | AlignmentChanged { .. } if grows_handle => Verdict::Compatible,
        SizeChanged { .. } | AlignmentChanged { .. } | FieldOffsetChanged { .. } => Verdict::BinaryBreaking,
        VTableSlotAdded { index, old_count, .. } if index >= old_count => Verdict::Compatible,
        VTableSlotAdded { .. } | VTableSlotRemoved { .. } | VTableSlotMoved { .. } | VptrChanged { .. } => {
            Verdict::BinaryBreaking
        }
        LayoutUnavailable { .. } => Verdict::ManualReview,
    }
}

fn method_kind_verdict(old: MethodKind, new: MethodKind) -> Verdict {
    match (old, new) {
        (MethodKind::PureVirtual, MethodKind::Virtual) => Verdict::Compatible,
        (MethodKind::Virtual, MethodKind::PureVirtual) => Verdict::SourceBreaking,
        (MethodKind::Static, _) | (_, MethodKind::Static) => Verdict::SourceBreaking,
        _ => Verdict::BinaryBreaking,
    }
}
