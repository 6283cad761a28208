// Sun Jan 18 2026 - Alex

use crate::config::DataModel;
use crate::model::PrimitiveType;
use crate::structure::{Alignment, Size};

impl DataModel {
    pub fn pointer_size(&self) -> u64 {
        match self {
            DataModel::Lp64 | DataModel::Llp64 => 8,
            DataModel::Ilp32 => 4,
        }
    }

    pub fn pointer_layout(&self) -> (Size, Alignment) {
        let size = self.pointer_size();
        (Size::new(size), Alignment::new(size))
    }

    /// Size and alignment of a built-in type; `None` for `void`.
    pub fn primitive_layout(&self, ty: PrimitiveType) -> Option<(Size, Alignment)> {
        use PrimitiveType::*;
        let (size, align) = match ty {
            Void => return None,
            Bool | Char | SignedChar | UnsignedChar | Int8 | UInt8 => (1, 1),
            Short | UnsignedShort | Int16 | UInt16 | Char16 => (2, 2),
            Int | UnsignedInt | Int32 | UInt32 | Char32 | Float => (4, 4),
            LongLong | UnsignedLongLong | Int64 | UInt64 => (8, 8),
            WChar => match self {
                DataModel::Llp64 => (2, 2),
                _ => (4, 4),
            },
            Long | UnsignedLong => match self {
                DataModel::Lp64 => (8, 8),
                _ => (4, 4),
            },
            // i386 System V aligns 8-byte doubles to 4 inside aggregates
            Double => match self {
                DataModel::Ilp32 => (8, 4),
                _ => (8, 8),
            },
            LongDouble => match self {
                DataModel::Lp64 => (16, 16),
                DataModel::Llp64 => (8, 8),
                DataModel::Ilp32 => (12, 4),
            },
            SizeT | PtrDiffT => (self.pointer_size(), self.pointer_size()),
        };
        Some((Size::new(size), Alignment::new(align)))
    }
}
