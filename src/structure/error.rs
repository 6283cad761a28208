// Tue Jan 13 2026 - Alex

use thiserror::Error;

/// Why one record could not be laid out. Never affects unrelated records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("`{record}` is declared but never defined")]
    Incomplete { record: String },
    #[error("Field `{field}` of `{record}` has type `{ty}` with no computable size")]
    UnknownSize { record: String, field: String, ty: String },
    #[error("`{record}` depends on `{dependency}`, whose layout failed")]
    DependencyFailed { record: String, dependency: String },
    #[error("`{record}` has no dependency order")]
    Unordered { record: String },
    #[error("`{record}` is larger than the address space")]
    Overflow { record: String },
}

impl LayoutError {
    pub fn record(&self) -> &str {
        match self {
            LayoutError::Incomplete { record }
            | LayoutError::UnknownSize { record, .. }
            | LayoutError::DependencyFailed { record, .. }
            | LayoutError::Unordered { record }
            | LayoutError::Overflow { record } => record,
        }
    }
}
