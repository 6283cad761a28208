// Fri Jan 16 2026 - Alex

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Built-in C++ types recognised without a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Void,
    Bool,
    Char,
    SignedChar,
    UnsignedChar,
    WChar,
    Char16,
    Char32,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    SizeT,
    PtrDiffT,
}

static FIXED_NAMES: Lazy<HashMap<&'static str, PrimitiveType>> = Lazy::new(|| {
    use PrimitiveType::*;
    let mut map = HashMap::new();
    for (name, ty) in [
        ("void", Void),
        ("bool", Bool),
        ("wchar_t", WChar),
        ("char16_t", Char16),
        ("char32_t", Char32),
        ("float", Float),
        ("int8_t", Int8),
        ("int16_t", Int16),
        ("int32_t", Int32),
        ("int64_t", Int64),
        ("uint8_t", UInt8),
        ("uint16_t", UInt16),
        ("uint32_t", UInt32),
        ("uint64_t", UInt64),
        ("size_t", SizeT),
        ("ptrdiff_t", PtrDiffT),
    ] {
        map.insert(name, ty);
    }
    map
});

impl PrimitiveType {
    /// Recognises a spelled built-in type, in any specifier order
    /// (`unsigned long`, `long unsigned int`, `std::size_t`).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let unqualified = name.strip_prefix("std::").unwrap_or(name);
        if let Some(ty) = FIXED_NAMES.get(unqualified) {
            return Some(*ty);
        }

        let mut signed = false;
        let mut unsigned = false;
        let mut longs = 0usize;
        let mut short = false;
        let mut char_ = false;
        let mut int = false;
        let mut double = false;

        for word in name.split_whitespace() {
            match word {
                "signed" => signed = true,
                "unsigned" => unsigned = true,
                "long" => longs += 1,
                "short" => short = true,
                "char" => char_ = true,
                "int" => int = true,
                "double" => double = true,
                _ => return None,
            }
        }
        if signed && unsigned {
            return None;
        }

        use PrimitiveType::*;
        let ty = match (char_, short, longs, double) {
            (true, false, 0, false) if !int => {
                if unsigned {
                    UnsignedChar
                } else if signed {
                    SignedChar
                } else {
                    Char
                }
            }
            (false, false, 0, true) if !signed && !unsigned && !int => Double,
            (false, false, 1, true) if !signed && !unsigned && !int => LongDouble,
            (false, true, 0, false) => if unsigned { UnsignedShort } else { Short },
            (false, false, 1, false) => if unsigned { UnsignedLong } else { Long },
            (false, false, 2, false) => if unsigned { UnsignedLongLong } else { LongLong },
            (false, false, 0, false) if int || signed || unsigned => {
                if unsigned {
                    UnsignedInt
                } else {
                    Int
                }
            }
            _ => return None,
        };
        Some(ty)
    }

    pub fn spelling(self) -> &'static str {
        use PrimitiveType::*;
        match self {
            Void => "void",
            Bool => "bool",
            Char => "char",
            SignedChar => "signed char",
            UnsignedChar => "unsigned char",
            WChar => "wchar_t",
            Char16 => "char16_t",
            Char32 => "char32_t",
            Short => "short",
            UnsignedShort => "unsigned short",
            Int => "int",
            UnsignedInt => "unsigned int",
            Long => "long",
            UnsignedLong => "unsigned long",
            LongLong => "long long",
            UnsignedLongLong => "unsigned long long",
            Float => "float",
            Double => "double",
            LongDouble => "long double",
            Int8 => "int8_t",
            Int16 => "int16_t",
            Int32 => "int32_t",
            Int64 => "int64_t",
            UInt8 => "uint8_t",
            UInt16 => "uint16_t",
            UInt32 => "uint32_t",
            UInt64 => "uint64_t",
            SizeT => "size_t",
            PtrDiffT => "ptrdiff_t",
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(
            self,
            Self::Void | Self::Float | Self::Double | Self::LongDouble
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::LongDouble)
    }

    pub fn is_void(self) -> bool {
        self == Self::Void
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specifier_order_is_irrelevant() {
        assert_eq!(PrimitiveType::from_name("unsigned long"), Some(PrimitiveType::UnsignedLong));
        assert_eq!(PrimitiveType::from_name("long unsigned int"), Some(PrimitiveType::UnsignedLong));
        assert_eq!(PrimitiveType::from_name("long long"), Some(PrimitiveType::LongLong));
        assert_eq!(PrimitiveType::from_name("unsigned"), Some(PrimitiveType::UnsignedInt));
        assert_eq!(PrimitiveType::from_name("std::size_t"), Some(PrimitiveType::SizeT));
    }

    #[test]
    fn test_rejects_user_types() {
        assert_eq!(PrimitiveType::from_name("S1"), None);
        assert_eq!(PrimitiveType::from_name("signed unsigned"), None);
        assert_eq!(PrimitiveType::from_name("short double"), None);
    }

    #[test]
    fn test_char_variants_are_distinct() {
        assert_eq!(PrimitiveType::from_name("char"), Some(PrimitiveType::Char));
        assert_eq!(PrimitiveType::from_name("signed char"), Some(PrimitiveType::SignedChar));
        assert_eq!(PrimitiveType::from_name("unsigned char"), Some(PrimitiveType::UnsignedChar));
    }
}
