// Fri Jan 16 2026 - Alex

use crate::model::QualifiedName;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleKind {
    BaseChain,
    TypedefAlias,
    Containment,
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleKind::BaseChain => write!(f, "base-class"),
            CycleKind::TypedefAlias => write!(f, "typedef"),
            CycleKind::Containment => write!(f, "by-value containment"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unresolved symbol `{symbol}` referenced in scope `{scope}`")]
    Resolution { symbol: String, scope: String },
    #[error("{kind} cycle: {}", join_path(.path))]
    Cycle { kind: CycleKind, path: Vec<QualifiedName> },
    #[error("Unsupported construct in `{entity}`: {reason}")]
    Unsupported { entity: String, reason: String },
    #[error("Duplicate declaration: {0}")]
    Duplicate(String),
    #[error("`{method}` in `{record}` is marked override but no base declares a matching virtual")]
    InvalidOverride { record: String, method: String },
    #[error("Invalid literal `{token}` in `{entity}`")]
    InvalidLiteral { entity: String, token: String },
}

fn join_path(path: &[QualifiedName]) -> String {
    path.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_full_path() {
        let err = ModelError::Cycle {
            kind: CycleKind::BaseChain,
            path: vec![
                QualifiedName::parse("A"),
                QualifiedName::parse("B"),
                QualifiedName::parse("A"),
            ],
        };
        assert_eq!(err.to_string(), "base-class cycle: A -> B -> A");
    }
}
