// Tue Jan 13 2026 - Alex

pub mod visitor;
pub mod pxd;
pub mod pyx;

pub use visitor::{walk, ModelVisitor, VisitorGroup};
pub use pxd::{declare, PxdWriter};
pub use pyx::PyxWriter;
