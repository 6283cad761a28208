// Tue Jan 15 2026 - Alex

pub mod change;
pub mod record;
pub mod engine;
pub mod report;

pub use change::{Change, ChangeDetail, ChangeKind};
pub use record::compare_records;
pub use engine::DiffEngine;
pub use report::{DiffReport, DiffSummary, ReportFormat};
