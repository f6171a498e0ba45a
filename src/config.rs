//! Configuration for the training pipeline and the inference service.
//!
//! Every section has a `Default` matching the conventional project layout:
//!
//! ```text
//! data/raw/Fake.csv
//! data/raw/True.csv
//! models/best_model.bin
//! models/tfidf_vectorizer.bin
//! ```
//!
//! A configuration can also be read from a JSON file; missing keys fall back
//! to their defaults.
//!
//! ```
//! use credence::config::PipelineConfig;
//!
//! let config: PipelineConfig =
//!     serde_json::from_str(r#"{ "split": { "test_ratio": 0.25 } }"#).unwrap();
//! assert_eq!(config.split.test_ratio, 0.25);
//! assert_eq!(config.split.seed, 42);
//! config.validate().unwrap();
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CredenceError, Result};

/// Seed shared by the shuffle, the split and the classifier by default.
pub const DEFAULT_SEED: u64 = 42;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Dataset sources.
    pub data: DataConfig,
    /// Train/test split.
    pub split: SplitConfig,
    /// TF-IDF vectorizer hyperparameters.
    pub vectorizer: VectorizerConfig,
    /// Classifier hyperparameters.
    pub classifier: ClassifierConfig,
    /// Persisted artifact locations.
    pub artifacts: ArtifactConfig,
}

impl PipelineConfig {
    /// Read a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CredenceError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is within its valid range.
    pub fn validate(&self) -> Result<()> {
        if self.data.text_column.trim().is_empty() {
            return Err(CredenceError::config("data.text_column must not be empty"));
        }
        if !(self.split.test_ratio > 0.0 && self.split.test_ratio < 1.0) {
            return Err(CredenceError::config(format!(
                "split.test_ratio must be in (0, 1), got {}",
                self.split.test_ratio
            )));
        }
        if self.vectorizer.max_features == Some(0) {
            return Err(CredenceError::config(
                "vectorizer.max_features must be positive when set",
            ));
        }
        if self.vectorizer.min_df == 0 {
            return Err(CredenceError::config("vectorizer.min_df must be at least 1"));
        }
        if !(self.vectorizer.max_df > 0.0 && self.vectorizer.max_df <= 1.0) {
            return Err(CredenceError::config(format!(
                "vectorizer.max_df must be in (0, 1], got {}",
                self.vectorizer.max_df
            )));
        }
        if self.classifier.learning_rate <= 0.0 {
            return Err(CredenceError::config(
                "classifier.learning_rate must be positive",
            ));
        }
        if self.classifier.l2_penalty < 0.0 {
            return Err(CredenceError::config(
                "classifier.l2_penalty must not be negative",
            ));
        }
        if self.classifier.max_epochs == 0 {
            return Err(CredenceError::config(
                "classifier.max_epochs must be at least 1",
            ));
        }
        if self.artifacts.model_path == self.artifacts.vectorizer_path {
            return Err(CredenceError::config(
                "artifacts.model_path and artifacts.vectorizer_path must differ",
            ));
        }
        Ok(())
    }

    /// Point both dataset paths at `Fake.csv` and `True.csv` inside `dir`.
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let dir = dir.as_ref();
        self.data.fake_path = dir.join(FAKE_FILE_NAME);
        self.data.real_path = dir.join(REAL_FILE_NAME);
        self
    }

    /// Place both artifacts inside `dir`, keeping their file names.
    pub fn with_model_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.artifacts = ArtifactConfig::in_dir(dir);
        self
    }
}

const FAKE_FILE_NAME: &str = "Fake.csv";
const REAL_FILE_NAME: &str = "True.csv";
const MODEL_FILE_NAME: &str = "best_model.bin";
const VECTORIZER_FILE_NAME: &str = "tfidf_vectorizer.bin";

/// Dataset sources. Every record of `fake_path` is labelled fake, every
/// record of `real_path` real.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub fake_path: PathBuf,
    pub real_path: PathBuf,
    /// Name of the column holding the article body.
    pub text_column: String,
    /// Seed of the post-merge shuffle.
    pub shuffle_seed: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        let dir = Path::new("data").join("raw");
        Self {
            fake_path: dir.join(FAKE_FILE_NAME),
            real_path: dir.join(REAL_FILE_NAME),
            text_column: "text".to_string(),
            shuffle_seed: DEFAULT_SEED,
        }
    }
}

/// Train/test split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of rows held out for evaluation.
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: DEFAULT_SEED,
        }
    }
}

/// TF-IDF vectorizer hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Keep only the most frequent terms. `None` keeps all of them.
    pub max_features: Option<usize>,
    /// Minimum number of documents a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in.
    pub max_df: f64,
    /// Shorter tokens are ignored when building features.
    pub min_token_len: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: Some(5000),
            min_df: 1,
            max_df: 1.0,
            min_token_len: 2,
        }
    }
}

/// Logistic regression hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Initial SGD step size; decays as `lr / sqrt(epoch + 1)`.
    pub learning_rate: f64,
    /// L2 regularization strength.
    pub l2_penalty: f64,
    pub max_epochs: usize,
    /// Stop once the mean epoch loss improves by less than this.
    pub tolerance: f64,
    /// Seed of the per-epoch sample shuffle.
    pub seed: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            l2_penalty: 1e-4,
            max_epochs: 50,
            tolerance: 1e-5,
            seed: DEFAULT_SEED,
        }
    }
}

/// Locations of the persisted classifier and vectorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
}

impl ArtifactConfig {
    /// Both artifacts inside `dir` with their conventional file names.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model_path: dir.join(MODEL_FILE_NAME),
            vectorizer_path: dir.join(VECTORIZER_FILE_NAME),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self::in_dir("models")
    }
}
