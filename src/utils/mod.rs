// Tue Jan 13 2026 - Alex

pub mod logging;
#[cfg(test)]
pub mod testing;

pub use logging::{LoggingUtils, ScopedTimer};

/// `None` when the rounded value does not fit in a `u64`.
pub fn align_up(value: u64, alignment: u64) -> Option<u64> {
    if alignment == 0 {
        return Some(value);
    }
    Some(value.checked_add(alignment - 1)? / alignment * alignment)
}

pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
