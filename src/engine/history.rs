// Tue Jan 13 2026 - Alex

use crate::builder::BuildErrors;
use crate::engine::{EngineError, HistoryStep, Pipeline};
use crate::structure::AnnotatedModel;
use crate::syntax::SourceVersion;
use parking_lot::Mutex;
use rayon::prelude::*;

/// Classifies every consecutive pair of an ordered version list.
///
/// Each version is built once and shared by the two pairs it belongs to.
/// Models are read-only once built, so pairs are compared concurrently.
pub struct VersionHistory<'p> {
    pipeline: &'p Pipeline,
}

impl<'p> VersionHistory<'p> {
    pub fn new(pipeline: &'p Pipeline) -> Self {
        Self { pipeline }
    }

    /// Number of progress ticks `compare_all` reports for `versions` inputs.
    pub fn step_count(versions: usize) -> usize {
        versions + versions.saturating_sub(1)
    }

    /// `on_step` runs once per built version and once per compared pair,
    /// possibly from worker threads.
    pub fn compare_all<F>(&self, versions: &[SourceVersion], on_step: F) -> Result<Vec<HistoryStep>, EngineError>
    where
        F: Fn(&str) + Sync,
    {
        if versions.len() < 2 {
            return Err(EngineError::NotEnoughVersions(versions.len()));
        }
        let parallel = self.pipeline.config().parallel;
        let failures: Mutex<Vec<BuildErrors>> = Mutex::new(Vec::new());

        let build = |version: &SourceVersion| -> Option<AnnotatedModel> {
            let result = self.pipeline.annotate(version);
            on_step(&format!("built {}", version.label));
            match result {
                Ok(model) => Some(model),
                Err(errors) => {
                    log::warn!("{}", errors);
                    failures.lock().push(errors);
                    None
                }
            }
        };
        let models: Vec<Option<AnnotatedModel>> = self.pipeline.install(|| {
            if parallel {
                versions.par_iter().map(build).collect()
            } else {
                versions.iter().map(build).collect()
            }
        });

        let failures = failures.into_inner();
        if !failures.is_empty() {
            return Err(EngineError::Versions {
                failures,
                total: versions.len(),
            });
        }
        let models: Vec<AnnotatedModel> = models.into_iter().flatten().collect();

        let compare = |pair: &[AnnotatedModel]| -> HistoryStep {
            let (old, new) = (&pair[0], &pair[1]);
            let changes = self.pipeline.compare_models(old, new);
            on_step(&format!("compared {} -> {}", old.label(), new.label()));
            HistoryStep {
                old_label: old.label().to_string(),
                new_label: new.label().to_string(),
                changes,
            }
        };
        let steps: Vec<HistoryStep> = self.pipeline.install(|| {
            if parallel {
                models.par_windows(2).map(compare).collect()
            } else {
                models.windows(2).map(compare).collect()
            }
        });
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Verdict;
    use crate::config::Config;
    use crate::syntax::{SyntaxNode, TypeSpec};
    use crate::utils::testing::{for_test_version, ForTestStage, NS};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn stages() -> Vec<SourceVersion> {
        [
            ForTestStage::Plain,
            ForTestStage::BuildFunction,
            ForTestStage::PureVirtual,
            ForTestStage::Destructor,
        ]
        .into_iter()
        .map(for_test_version)
        .collect()
    }

    #[test]
    fn test_history_pairs_in_order() {
        let pipeline = Pipeline::new(Config::default().with_threads(4)).unwrap();
        let ticks = AtomicUsize::new(0);
        let steps = VersionHistory::new(&pipeline)
            .compare_all(&stages(), |_| {
                ticks.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].old_label, "plain");
        assert_eq!(steps[0].new_label, "buildfunction");
        assert_eq!(steps[2].new_label, "destructor");
        assert!(steps.iter().all(|s| s.worst() == Some(Verdict::Compatible)));
        assert_eq!(ticks.load(Ordering::SeqCst), VersionHistory::step_count(4));
    }

    #[test]
    fn test_history_matches_pairwise_compare() {
        let pipeline = Pipeline::new(Config::default().with_threads(2)).unwrap();
        let versions = stages();
        let steps = VersionHistory::new(&pipeline).compare_all(&versions, |_| {}).unwrap();
        let direct = pipeline.compare(&versions[1], &versions[2]).unwrap();
        assert_eq!(steps[1].changes, direct.changes);
    }

    #[test]
    fn test_history_needs_two_versions() {
        let pipeline = Pipeline::new(Config::default().with_threads(1)).unwrap();
        let err = VersionHistory::new(&pipeline)
            .compare_all(&stages()[..1], |_| {})
            .unwrap_err();
        assert!(matches!(err, EngineError::NotEnoughVersions(1)));
    }

    #[test]
    fn test_history_collects_every_failure() {
        let pipeline = Pipeline::new(Config::default().with_threads(2)).unwrap();
        let mut versions = stages();
        for version in versions.iter_mut().skip(1).step_by(2) {
            version
                .nodes
                .push(SyntaxNode::function(&[NS], "broken", TypeSpec::new("Missing"), vec![]));
        }
        let err = VersionHistory::new(&pipeline).compare_all(&versions, |_| {}).unwrap_err();
        assert!(matches!(err, EngineError::Versions { ref failures, total: 4 } if failures.len() == 2));
    }
}
