// Tue Jan 13 2026 - Alex

use crate::classify::{worst_verdict, ClassifiedChange, Verdict};
use crate::diff::DiffReport;
use crate::structure::AnnotatedModel;

/// Outcome of comparing one pair of versions.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub old: AnnotatedModel,
    pub new: AnnotatedModel,
    pub changes: Vec<ClassifiedChange>,
}

impl ComparisonResult {
    pub fn worst(&self) -> Option<Verdict> {
        worst_verdict(&self.changes)
    }

    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn report(&self) -> DiffReport {
        DiffReport::new(self.old.label(), self.new.label(), self.changes.clone())
    }
}

/// Classified changes of one consecutive pair in a version history.
#[derive(Debug, Clone)]
pub struct HistoryStep {
    pub old_label: String,
    pub new_label: String,
    pub changes: Vec<ClassifiedChange>,
}

impl HistoryStep {
    pub fn worst(&self) -> Option<Verdict> {
        worst_verdict(&self.changes)
    }

    pub fn report(&self) -> DiffReport {
        DiffReport::new(&self.old_label, &self.new_label, self.changes.clone())
    }
}
