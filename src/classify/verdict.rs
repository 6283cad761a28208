// Mon Jan 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compatibility verdict, ordered from harmless to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Compatible,
    /// Layout could not be computed, so layout-derived effects are unknown.
    ManualReview,
    BinaryBreaking,
    SourceBreaking,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::Compatible,
        Verdict::ManualReview,
        Verdict::BinaryBreaking,
        Verdict::SourceBreaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Compatible => "COMPATIBLE",
            Verdict::ManualReview => "MANUAL REVIEW",
            Verdict::BinaryBreaking => "BINARY BREAKING",
            Verdict::SourceBreaking => "SOURCE BREAKING",
        }
    }

    pub fn is_breaking(&self) -> bool {
        *self >= Verdict::BinaryBreaking
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_order() {
        assert!(Verdict::Compatible < Verdict::ManualReview);
        assert!(Verdict::ManualReview < Verdict::BinaryBreaking);
        assert!(Verdict::BinaryBreaking < Verdict::SourceBreaking);
        assert_eq!(Verdict::ALL.iter().max(), Some(&Verdict::SourceBreaking));
        assert!(!Verdict::ManualReview.is_breaking());
    }
}
