//! Binary logistic regression trained with stochastic gradient descent.
//!
//! The model predicts the probability that an article is fake:
//!
//! ```text
//! p(fake | x) = sigmoid(w . x + b)
//! ```
//!
//! Training minimizes the mean log-loss plus an L2 penalty on `w`. Samples
//! are visited in a seeded random order each epoch, so the same data and
//! configuration always produce the same weights.

use std::time::Instant;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::dataset::Label;
use crate::error::{CredenceError, Result};
use crate::ml::models::{Classifier, ModelMetadata, TrainingStats};
use crate::ml::sparse::SparseVector;

const MODEL_NAME: &str = "LogisticRegression";

/// Below this the lazily applied L2 decay is folded back into the weights.
const MIN_WEIGHT_SCALE: f64 = 1e-9;

/// L2-regularized logistic regression over sparse TF-IDF vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    config: ClassifierConfig,
    weights: Vec<f64>,
    bias: f64,
    trained: bool,
    training_stats: Option<TrainingStats>,
    metadata: ModelMetadata,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl LogisticRegression {
    /// Create an untrained model.
    pub fn new(config: ClassifierConfig) -> Self {
        let mut metadata = ModelMetadata::new(MODEL_NAME);
        metadata
            .hyperparameters
            .insert("learning_rate".to_string(), config.learning_rate);
        metadata
            .hyperparameters
            .insert("l2_penalty".to_string(), config.l2_penalty);
        metadata
            .hyperparameters
            .insert("max_epochs".to_string(), config.max_epochs as f64);
        metadata
            .hyperparameters
            .insert("tolerance".to_string(), config.tolerance);

        Self {
            config,
            weights: Vec::new(),
            bias: 0.0,
            trained: false,
            training_stats: None,
            metadata,
        }
    }

    /// Fit the model on `features` and their `labels`.
    ///
    /// All vectors must share one dimension and both labels must be present.
    pub fn fit(&mut self, features: &[SparseVector], labels: &[Label]) -> Result<()> {
        let n_samples = features.len();
        if n_samples == 0 {
            return Err(CredenceError::training("no training examples"));
        }
        if n_samples != labels.len() {
            return Err(CredenceError::training(format!(
                "{n_samples} feature vectors but {} labels",
                labels.len()
            )));
        }
        if Label::ALL.iter().any(|label| !labels.contains(label)) {
            return Err(CredenceError::training(
                "training data must contain both REAL and FAKE examples",
            ));
        }
        let dim = features[0].dim();
        if let Some(v) = features.iter().find(|v| v.dim() != dim) {
            return Err(CredenceError::training(format!(
                "inconsistent feature dimensions: {} and {}",
                dim,
                v.dim()
            )));
        }

        let lr0 = self.config.learning_rate;
        let l2 = self.config.l2_penalty;
        if lr0.is_nan() || lr0 <= 0.0 || l2 < 0.0 || lr0 * l2 >= 1.0 {
            return Err(CredenceError::config(format!(
                "learning_rate ({lr0}) and l2_penalty ({l2}) must satisfy lr > 0 and lr * l2 < 1"
            )));
        }

        let start = Instant::now();
        let targets: Vec<f64> = labels.iter().map(|l| l.index() as f64).collect();

        // Effective weights are `scale * weights`; decay only touches `scale`.
        let mut weights = vec![0.0; dim];
        let mut scale = 1.0;
        let mut bias = 0.0;

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut stats = TrainingStats::default();

        for epoch in 0..self.config.max_epochs {
            order.shuffle(&mut rng);
            let lr = lr0 / ((epoch + 1) as f64).sqrt();
            let mut epoch_loss = 0.0;

            for &i in &order {
                let x = &features[i];
                let y = targets[i];
                let z = scale * x.dot(&weights) + bias;
                epoch_loss += log_loss(z, y);

                let gradient = sigmoid(z) - y;
                scale *= 1.0 - lr * l2;
                let step = lr * gradient / scale;
                for (j, value) in x.iter() {
                    weights[j] -= step * value;
                }
                bias -= lr * gradient;

                if scale < MIN_WEIGHT_SCALE {
                    weights.iter_mut().for_each(|w| *w *= scale);
                    scale = 1.0;
                }
            }

            let mean_loss = epoch_loss / n_samples as f64;
            debug!("Epoch {}: mean log-loss {:.6}", epoch + 1, mean_loss);
            let previous = stats.training_losses.last().copied();
            stats.training_losses.push(mean_loss);
            stats.iterations = epoch + 1;

            if previous.is_some_and(|prev| (prev - mean_loss).abs() < self.config.tolerance) {
                stats.early_stopped = true;
                break;
            }
        }

        weights.iter_mut().for_each(|w| *w *= scale);

        stats.final_training_loss = stats.training_losses.last().copied().unwrap_or_default();
        stats.training_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Trained {} on {} examples x {} features: {} epochs, final loss {:.6}{}",
            MODEL_NAME,
            n_samples,
            dim,
            stats.iterations,
            stats.final_training_loss,
            if stats.early_stopped { " (converged)" } else { "" }
        );

        self.weights = weights;
        self.bias = bias;
        self.trained = true;
        self.metadata.trained_at = chrono::Utc::now();
        self.metadata.training_examples = n_samples;
        self.metadata.n_features = dim;
        self.training_stats = Some(stats);
        Ok(())
    }

    pub fn is_trained(&self) -> bool {
        self.trained
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Learned coefficients, one per feature.
    pub fn coefficients(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.bias
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn training_stats(&self) -> Option<&TrainingStats> {
        self.training_stats.as_ref()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Replace the recorded evaluation metrics.
    pub fn set_validation_metrics<I>(&mut self, metrics: I)
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        self.metadata.validation_metrics = metrics.into_iter().collect();
    }

    /// The `k` features pushing hardest towards `label`, strongest first.
    pub fn top_features(&self, label: Label, k: usize) -> Vec<(usize, f64)> {
        let mut indexed: Vec<(usize, f64)> = self
            .weights
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, w)| match label {
                Label::Fake => w > 0.0,
                Label::Real => w < 0.0,
            })
            .collect();
        match label {
            Label::Fake => indexed.sort_by(|a, b| b.1.total_cmp(&a.1)),
            Label::Real => indexed.sort_by(|a, b| a.1.total_cmp(&b.1)),
        }
        indexed.truncate(k);
        indexed
    }

    fn fake_probability(&self, features: &SparseVector) -> Result<f64> {
        if !self.trained {
            return Err(CredenceError::not_fitted("model has not been trained"));
        }
        if features.dim() != self.weights.len() {
            return Err(CredenceError::prediction(format!(
                "feature dimension {} does not match model dimension {}",
                features.dim(),
                self.weights.len()
            )));
        }
        Ok(sigmoid(features.dot(&self.weights) + self.bias))
    }
}

impl Classifier for LogisticRegression {
    fn predict(&self, features: &SparseVector) -> Result<Label> {
        let p_fake = self.fake_probability(features)?;
        Ok(if p_fake > 0.5 { Label::Fake } else { Label::Real })
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<[f64; 2]> {
        let p_fake = self.fake_probability(features)?;
        Ok([1.0 - p_fake, p_fake])
    }

    fn name(&self) -> &str {
        &self.metadata.name
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `-[y ln p + (1 - y) ln(1 - p)]` with `p = sigmoid(z)`, computed without overflow.
fn log_loss(z: f64, y: f64) -> f64 {
    let softplus = z.max(0.0) + (-z.abs()).exp().ln_1p();
    softplus - y * z
}
