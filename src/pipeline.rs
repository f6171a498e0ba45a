//! The end-to-end training run.
//!
//! ```text
//! LOAD -> NORMALIZE -> FIT_VECTORIZE -> SPLIT -> TRAIN -> EVALUATE -> PERSIST
//! ```
//!
//! Stages run strictly in order. The first failure aborts the run and is
//! reported as [`CredenceError::StageFailed`] naming the stage; nothing is
//! persisted unless every earlier stage succeeded. A successful run replaces
//! any previously saved artifact pair.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, error, info};
use serde::Serialize;

use crate::analysis::analyzer::normalizer::TextNormalizer;
use crate::artifact::{ArtifactPair, ArtifactStore};
use crate::config::PipelineConfig;
use crate::dataset::{DatasetLoader, Label, train_test_split};
use crate::error::Result;
use crate::ml::evaluation::{EvaluationReport, evaluate};
use crate::ml::logistic::LogisticRegression;
use crate::ml::models::TrainingStats;
use crate::ml::tfidf::TfIdfVectorizer;

/// A step of the training run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Normalize,
    FitVectorize,
    Split,
    Train,
    Evaluate,
    Persist,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::Load,
        Stage::Normalize,
        Stage::FitVectorize,
        Stage::Split,
        Stage::Train,
        Stage::Evaluate,
        Stage::Persist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Load => "LOAD",
            Stage::Normalize => "NORMALIZE",
            Stage::FitVectorize => "FIT_VECTORIZE",
            Stage::Split => "SPLIT",
            Stage::Train => "TRAIN",
            Stage::Evaluate => "EVALUATE",
            Stage::Persist => "PERSIST",
        }
    }

    /// Progress line printed when the stage starts.
    pub fn progress_message(self) -> &'static str {
        match self {
            Stage::Load => "Loading data...",
            Stage::Normalize => "Cleaning text...",
            Stage::FitVectorize => "Building features...",
            Stage::Split => "Splitting train/test sets...",
            Stage::Train => "Training model...",
            Stage::Evaluate => "Evaluating model...",
            Stage::Persist => "Saving model...",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub n_records: usize,
    pub n_fake: usize,
    pub n_real: usize,
    pub vocabulary_size: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub training_stats: TrainingStats,
    pub report: EvaluationReport,
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
    pub elapsed_ms: u64,
}

/// Runs the full training pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct TrainingPipeline {
    config: PipelineConfig,
    progress: bool,
}

impl TrainingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            progress: true,
        }
    }

    /// Enable or disable the stdout progress lines. Logging is unaffected.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute every stage and persist the artifact pair.
    pub fn run(&self) -> Result<TrainingSummary> {
        self.config.validate()?;
        let start = Instant::now();

        let dataset = self.stage(Stage::Load, || {
            DatasetLoader::from_config(&self.config.data).load()
        })?;
        let labels = dataset.labels();

        let normalized = self.stage(Stage::Normalize, || {
            TextNormalizer::new()?.normalize_all(&dataset.texts())
        })?;

        let mut vectorizer = TfIdfVectorizer::new(self.config.vectorizer.clone());
        let features = self.stage(Stage::FitVectorize, || vectorizer.fit_transform(&normalized))?;

        let ((train_x, test_x), (train_y, test_y)) = self.stage(Stage::Split, || {
            let split = train_test_split(
                features.len(),
                self.config.split.test_ratio,
                self.config.split.seed,
            )?;
            Ok((split.apply(&features), split.apply(&labels)))
        })?;
        info!(
            "Split {} records into {} train / {} test",
            features.len(),
            train_x.len(),
            test_x.len()
        );

        let mut classifier = LogisticRegression::new(self.config.classifier.clone());
        self.stage(Stage::Train, || classifier.fit(&train_x, &train_y))?;

        let report = self.stage(Stage::Evaluate, || evaluate(&classifier, &test_x, &test_y))?;
        if self.progress {
            println!("{report}");
        }
        debug!("Evaluation report:\n{report}");
        info!(
            "Held-out accuracy {:.4}, macro F1 {:.4}",
            report.accuracy, report.macro_avg.f1
        );

        let training_stats = classifier.training_stats().cloned().unwrap_or_default();
        classifier.set_validation_metrics(report.to_metric_map());

        let store = ArtifactStore::from_config(&self.config.artifacts);
        let pair = ArtifactPair::new(classifier, vectorizer);
        self.stage(Stage::Persist, || store.save(&pair))?;

        if self.progress {
            println!("Training complete!");
        }

        Ok(TrainingSummary {
            n_records: dataset.len(),
            n_fake: dataset.count(Label::Fake),
            n_real: dataset.count(Label::Real),
            vocabulary_size: pair.vectorizer.vocabulary_size(),
            n_train: train_x.len(),
            n_test: test_x.len(),
            training_stats,
            report,
            model_path: store.model_path().to_path_buf(),
            vectorizer_path: store.vectorizer_path().to_path_buf(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn stage<T, F>(&self, stage: Stage, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if self.progress {
            println!("{}", stage.progress_message());
        }
        info!("Stage {stage} started");
        let started = Instant::now();
        let result = f().map_err(|e| e.at_stage(stage.as_str()));
        match &result {
            Ok(_) => info!("Stage {stage} finished in {:?}", started.elapsed()),
            Err(e) => error!("{e}"),
        }
        result
    }
}

/// Run the pipeline with `config`, printing progress to stdout.
pub fn train(config: PipelineConfig) -> Result<TrainingSummary> {
    TrainingPipeline::new(config).run()
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_stage_order_and_names() {
        let names: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            vec!["LOAD", "NORMALIZE", "FIT_VECTORIZE", "SPLIT", "TRAIN", "EVALUATE", "PERSIST"]
        );
        assert_eq!(Stage::Load.progress_message(), "Loading data...");
        assert_eq!(Stage::FitVectorize.to_string(), "FIT_VECTORIZE");
    }

    #[test]
    fn test_missing_data_fails_at_load() {
        let dir = TempDir::new().unwrap();
        let config = PipelineConfig::default()
            .with_data_dir(dir.path().join("absent"))
            .with_model_dir(dir.path().join("models"));

        let err = TrainingPipeline::new(config.clone())
            .with_progress(false)
            .run()
            .unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().starts_with("LOAD stage failed"));
        assert!(!config.artifacts.model_path.exists());
    }

    #[test]
    fn test_invalid_config_rejected_before_any_stage() {
        let mut config = PipelineConfig::default();
        config.split.test_ratio = 2.0;
        let err = TrainingPipeline::new(config).with_progress(false).run().unwrap_err();
        assert!(matches!(err, crate::error::CredenceError::Config(_)));
    }
}
