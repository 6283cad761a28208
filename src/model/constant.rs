// Fri Jan 16 2026 - Alex

use crate::model::TypeRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal value of a constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Integer(i128),
    Bool(bool),
    Char(char),
    /// Normalised source text; compared textually.
    Float(String),
    Str(String),
    Array(Vec<ConstantValue>),
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Integer(v) => write!(f, "{}", v),
            ConstantValue::Bool(v) => write!(f, "{}", v),
            ConstantValue::Char(c) => write!(f, "'{}'", c.escape_default()),
            ConstantValue::Float(text) => write!(f, "{}", text),
            ConstantValue::Str(s) => write!(f, "\"{}\"", s.escape_default()),
            ConstantValue::Array(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantOrigin {
    /// `const` variable at namespace scope.
    Variable,
    /// Object-like `#define` with a literal body.
    Macro,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constant {
    pub ty: TypeRef,
    pub value: ConstantValue,
    pub origin: ConstantOrigin,
}
