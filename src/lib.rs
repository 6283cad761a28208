// Tue Jan 15 2026 - Alex

pub mod config;
pub mod syntax;
pub mod model;
pub mod builder;
pub mod structure;
pub mod diff;
pub mod classify;
pub mod engine;
pub mod output;
pub mod cli;
pub mod utils;

pub use config::{Config, DataModel};
pub use syntax::SourceVersion;
pub use model::DeclarationModel;
pub use builder::ModelBuilder;
pub use structure::{AnnotatedModel, LayoutEstimator};
pub use diff::{DiffEngine, DiffReport};
pub use classify::{Classifier, Verdict};
pub use engine::{Pipeline, VersionHistory};
pub use output::PxdWriter;
