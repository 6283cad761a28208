// Mon Jan 19 2026 - Alex

pub mod verdict;
pub mod usage;
pub mod policy;

pub use verdict::Verdict;
pub use usage::UsageContext;
pub use policy::{change_verdict, detail_verdict};

use crate::diff::Change;
use crate::structure::AnnotatedModel;
use serde::Serialize;

/// A change with the verdict attached to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedChange {
    #[serde(flatten)]
    pub change: Change,
    pub verdict: Verdict,
}

pub struct Classifier {
    usage: UsageContext,
}

impl Classifier {
    pub fn new(usage: UsageContext) -> Self {
        Self { usage }
    }

    pub fn for_versions(old: &AnnotatedModel, new: &AnnotatedModel) -> Self {
        Self::new(UsageContext::from_models(&[old.model(), new.model()]))
    }

    pub fn verdict(&self, change: &Change) -> Verdict {
        change_verdict(change, &self.usage)
    }

    pub fn classify(&self, changes: Vec<Change>) -> Vec<ClassifiedChange> {
        changes
            .into_iter()
            .map(|change| {
                let verdict = self.verdict(&change);
                log::debug!("{} -> {}", change, verdict);
                ClassifiedChange { change, verdict }
            })
            .collect()
    }
}

/// Worst verdict in a classified list, `None` when nothing changed.
pub fn worst_verdict(changes: &[ClassifiedChange]) -> Option<Verdict> {
    changes.iter().map(|c| c.verdict).max()
}
