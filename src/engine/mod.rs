// Tue Jan 13 2026 - Alex

pub mod error;
pub mod result;
pub mod pipeline;
pub mod history;

pub use error::EngineError;
pub use result::{ComparisonResult, HistoryStep};
pub use pipeline::Pipeline;
pub use history::VersionHistory;
