// Tue Jan 13 2026 - Alex

use crate::builder::{BuildErrors, ModelBuilder};
use crate::classify::{ClassifiedChange, Classifier};
use crate::config::Config;
use crate::diff::DiffEngine;
use crate::engine::{ComparisonResult, EngineError};
use crate::structure::{AnnotatedModel, LayoutEstimator};
use crate::syntax::SourceVersion;
use crate::utils::logging::ScopedTimer;
use crate::utils::pluralize;

/// Build, layout, diff and classify, run on a dedicated worker pool.
pub struct Pipeline {
    config: Config,
    pool: rayon::ThreadPool,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::Config)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|i| format!("abi-worker-{}", i))
            .build()?;
        log::debug!("Pipeline ready with {} worker threads", config.threads);
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn install<R, F>(&self, op: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Builds one version and estimates its layouts. Layout failures stay
    /// inside the returned model, logged once by the estimator; only build
    /// errors are fatal.
    pub fn annotate(&self, version: &SourceVersion) -> Result<AnnotatedModel, BuildErrors> {
        self.install(|| {
            let model = ModelBuilder::new(&self.config).build(version)?;
            Ok(LayoutEstimator::new(&self.config).estimate(model))
        })
    }

    pub fn compare_models(&self, old: &AnnotatedModel, new: &AnnotatedModel) -> Vec<ClassifiedChange> {
        let _timer = ScopedTimer::new(&format!("diff {} -> {}", old.label(), new.label()));
        let changes = DiffEngine::new(old, new).compare();
        Classifier::for_versions(old, new).classify(changes)
    }

    pub fn compare(&self, old: &SourceVersion, new: &SourceVersion) -> Result<ComparisonResult, EngineError> {
        let (old_model, new_model) = if self.config.parallel {
            self.install(|| rayon::join(|| self.annotate(old), || self.annotate(new)))
        } else {
            (self.annotate(old), self.annotate(new))
        };

        let (old_model, new_model) = match (old_model, new_model) {
            (Ok(old_model), Ok(new_model)) => (old_model, new_model),
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => return Err(EngineError::Build(err)),
            (Err(first), Err(second)) => {
                return Err(EngineError::Versions {
                    failures: vec![first, second],
                    total: 2,
                })
            }
        };

        let changes = self.compare_models(&old_model, &new_model);
        log::info!(
            "{} -> {}: {}",
            old_model.label(),
            new_model.label(),
            pluralize(changes.len(), "changed entity", "changed entities")
        );
        Ok(ComparisonResult {
            old: old_model,
            new: new_model,
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Verdict;
    use crate::syntax::{SyntaxNode, TypeSpec};
    use crate::utils::testing::{for_test_version, ForTestStage, NS};

    fn pipeline() -> Pipeline {
        Pipeline::new(Config::default().with_threads(2)).unwrap()
    }

    #[test]
    fn test_compare_fixture_stages() {
        let result = pipeline()
            .compare(
                &for_test_version(ForTestStage::Plain),
                &for_test_version(ForTestStage::BuildFunction),
            )
            .unwrap();
        assert_eq!(result.changes.len(), 1);
        assert_eq!(result.worst(), Some(Verdict::Compatible));
        assert_eq!(result.old.label(), "plain");
        assert_eq!(result.report().new_version, "buildfunction");
    }

    #[test]
    fn test_self_compare_is_unchanged() {
        let version = for_test_version(ForTestStage::Destructor);
        let result = pipeline().compare(&version, &version).unwrap();
        assert!(result.is_unchanged());
        assert_eq!(result.worst(), None);
    }

    #[test]
    fn test_build_failure_is_reported() {
        let good = for_test_version(ForTestStage::Plain);
        let mut bad = good.clone();
        bad.nodes.push(SyntaxNode::function(&[NS], "broken", TypeSpec::new("Missing"), vec![]));
        let err = pipeline().compare(&good, &bad).unwrap_err();
        assert!(matches!(err, EngineError::Build(ref e) if e.label == "plain"));

        let err = pipeline().compare(&bad, &bad).unwrap_err();
        assert!(matches!(err, EngineError::Versions { total: 2, .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            Pipeline::new(Config::default().with_threads(0)),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let old = for_test_version(ForTestStage::PureVirtual);
        let new = for_test_version(ForTestStage::Destructor);
        let parallel = pipeline().compare(&old, &new).unwrap();
        let sequential = Pipeline::new(Config::default().with_threads(1).with_parallel(false))
            .unwrap()
            .compare(&old, &new)
            .unwrap();
        assert_eq!(parallel.changes, sequential.changes);
    }

    #[test]
    fn test_layout_errors_stay_in_model() {
        let mut version = for_test_version(ForTestStage::Plain);
        version.nodes.push(SyntaxNode::record(
            &[NS],
            crate::syntax::RecordSyntax::new(crate::model::RecordTag::Struct, "Huge")
                .field("a", TypeSpec::new("int").array(u64::MAX)),
        ));
        let model = pipeline().annotate(&version).unwrap();
        assert_eq!(model.layout_errors().count(), 1);
        assert!(model
            .layout(&crate::model::QualifiedName::parse("for_test_namespace::S1"))
            .is_some());
    }
}
