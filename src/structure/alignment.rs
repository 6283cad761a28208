// Tue Jan 13 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// A power-of-two byte alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Alignment {
    value: u64,
}

impl Alignment {
    /// Rounds `value` up to the next power of two; zero becomes one.
    pub fn new(value: u64) -> Self {
        Self {
            value: value.max(1).next_power_of_two(),
        }
    }

    pub fn byte() -> Self {
        Self { value: 1 }
    }

    pub fn as_u64(&self) -> u64 {
        self.value
    }

    pub fn align(&self, offset: u64) -> Option<u64> {
        crate::utils::align_up(offset, self.value)
    }

    pub fn max(self, other: Self) -> Self {
        if other.value > self.value {
            other
        } else {
            self
        }
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::byte()
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        let four = Alignment::new(4);
        assert_eq!(four.align(7), Some(8));
        assert_eq!(four.align(8), Some(8));
        assert_eq!(four.align(u64::MAX - 1), None);
        assert_eq!(Alignment::new(0), Alignment::byte());
        assert_eq!(Alignment::new(3).as_u64(), 4);
    }
}
