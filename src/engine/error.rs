// Tue Jan 13 2026 - Alex

use crate::builder::BuildErrors;
use crate::syntax::SyntaxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Build(#[from] BuildErrors),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("History needs at least two versions, got {0}")]
    NotEnoughVersions(usize),
    #[error("{} of {} versions failed to build", .failures.len(), .total)]
    Versions { failures: Vec<BuildErrors>, total: usize },
}
