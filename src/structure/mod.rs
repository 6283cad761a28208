// Tue Jan 15 2026 - Alex

//! Layout estimation: sizes, alignments, field offsets and vtable shapes.

pub mod alignment;
pub mod size;
pub mod offset;
pub mod field;
pub mod layout;
pub mod vtable;
pub mod data_model;
pub mod error;
pub mod estimator;

pub use alignment::Alignment;
pub use size::Size;
pub use offset::Offset;
pub use field::FieldLayout;
pub use layout::RecordLayout;
pub use vtable::{compare_vtables, SlotId, VTable, VTableBuilder, VTableDifference, VTableEntry};
pub use error::LayoutError;
pub use estimator::{dependency_levels, AnnotatedModel, LayoutEstimator, LayoutMap, LayoutResult};
