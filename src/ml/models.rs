//! Shared model types: the classifier trait, model metadata and training statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::Result;
use crate::ml::sparse::SparseVector;

/// Trait for trained binary news classifiers.
///
/// Implementations are immutable once trained and can be shared across
/// threads.
pub trait Classifier: Send + Sync {
    /// Predict the label of a feature vector.
    fn predict(&self, features: &SparseVector) -> Result<Label>;

    /// Class probabilities ordered by [`Label::index`], summing to 1.
    fn predict_proba(&self, features: &SparseVector) -> Result<[f64; 2]>;

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}

/// Model metadata for tracking model information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name/identifier.
    pub name: String,
    /// Crate version that produced the model.
    pub version: String,
    /// Training timestamp.
    pub trained_at: chrono::DateTime<chrono::Utc>,
    /// Number of training examples used.
    pub training_examples: usize,
    /// Feature space dimension.
    pub n_features: usize,
    /// Model hyperparameters.
    pub hyperparameters: BTreeMap<String, f64>,
    /// Performance metrics on the held-out test set.
    pub validation_metrics: BTreeMap<String, f64>,
}

impl ModelMetadata {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            version: crate::VERSION.to_string(),
            trained_at: chrono::Utc::now(),
            training_examples: 0,
            n_features: 0,
            hyperparameters: BTreeMap::new(),
            validation_metrics: BTreeMap::new(),
        }
    }
}

/// Training statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingStats {
    /// Mean log-loss of each epoch.
    pub training_losses: Vec<f64>,
    /// Number of epochs completed.
    pub iterations: usize,
    /// Training time in milliseconds.
    pub training_time_ms: u64,
    /// Final training loss.
    pub final_training_loss: f64,
    /// Whether the loss converged before the epoch limit.
    pub early_stopped: bool,
}
