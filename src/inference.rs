//! Serving predictions from a persisted artifact pair.
//!
//! An [`InferenceService`] loads the classifier and vectorizer once and is
//! read-only afterwards, so a single instance can be shared (for example in
//! an `Arc`) by any number of request handlers.
//!
//! ```no_run
//! use credence::config::ArtifactConfig;
//! use credence::inference::{InferenceService, Verdict};
//!
//! let service = InferenceService::open(&ArtifactConfig::default()).unwrap();
//! match service.classify("NEW YORK (Reuters) - Stocks rose on Monday").unwrap() {
//!     Verdict::Judged(p) => println!("{} ({:.1}%)", p.label, p.confidence),
//!     Verdict::InsufficientInput(reason) => println!("cannot judge: {reason}"),
//! }
//! ```

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::normalizer::TextNormalizer;
use crate::artifact::{ArtifactPair, ArtifactStore};
use crate::config::ArtifactConfig;
use crate::dataset::Label;
use crate::error::{CredenceError, Result};
use crate::ml::models::{Classifier, ModelMetadata};

/// Why an input could not be judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientReason {
    /// The input was empty or only whitespace.
    EmptyInput,
    /// No word survived normalization.
    NoSignal,
}

impl fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsufficientReason::EmptyInput => f.write_str("input is empty"),
            InsufficientReason::NoSignal => {
                f.write_str("input contains no meaningful words after cleaning")
            }
        }
    }
}

/// A label with its probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Probabilities ordered by [`Label::index`].
    pub probabilities: [f64; 2],
    /// Probability of `label` as a percentage in `[0, 100]`.
    pub confidence: f64,
}

impl Prediction {
    fn new(label: Label, probabilities: [f64; 2]) -> Self {
        Self {
            label,
            probabilities,
            confidence: probabilities[label.index()] * 100.0,
        }
    }

    pub fn probability(&self, label: Label) -> f64 {
        self.probabilities[label.index()]
    }
}

/// Outcome of classifying one article.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Judged(Prediction),
    InsufficientInput(InsufficientReason),
}

impl Verdict {
    pub fn prediction(&self) -> Option<&Prediction> {
        match self {
            Verdict::Judged(p) => Some(p),
            Verdict::InsufficientInput(_) => None,
        }
    }

    pub fn label(&self) -> Option<Label> {
        self.prediction().map(|p| p.label)
    }
}

/// Classifies raw article text with a loaded artifact pair.
#[derive(Debug)]
pub struct InferenceService {
    normalizer: TextNormalizer,
    pair: ArtifactPair,
}

impl InferenceService {
    /// Load the artifact pair from `config`.
    ///
    /// Fails with a load error if either artifact is missing or unreadable,
    /// so no prediction is ever served without a complete pair.
    pub fn open(config: &ArtifactConfig) -> Result<Self> {
        let store = ArtifactStore::from_config(config);
        let pair = store.load()?.ok_or_else(|| {
            CredenceError::load(format!(
                "model artifacts not found ({} and {}); train a model first",
                store.model_path().display(),
                store.vectorizer_path().display()
            ))
        })?;
        Self::from_pair(pair)
    }

    /// Serve an in-memory pair.
    pub fn from_pair(pair: ArtifactPair) -> Result<Self> {
        if !pair.is_consistent() {
            return Err(CredenceError::load(format!(
                "classifier expects {} features but the vectorizer produces {}",
                pair.classifier.n_features(),
                pair.vectorizer.vocabulary_size()
            )));
        }
        Ok(Self {
            normalizer: TextNormalizer::new()?,
            pair,
        })
    }

    /// Classify one raw article.
    ///
    /// Empty input and input that normalizes to nothing yield
    /// [`Verdict::InsufficientInput`]. Failures on the vectorize/predict path
    /// are reported as prediction errors; the service stays usable.
    pub fn classify(&self, text: &str) -> Result<Verdict> {
        if text.trim().is_empty() {
            return Ok(Verdict::InsufficientInput(InsufficientReason::EmptyInput));
        }

        let normalized = self
            .normalizer
            .normalize(text)
            .map_err(|e| CredenceError::prediction(e.to_string()))?;
        if normalized.is_empty() {
            return Ok(Verdict::InsufficientInput(InsufficientReason::NoSignal));
        }

        let features = self
            .pair
            .vectorizer
            .transform_one(&normalized)
            .map_err(|e| CredenceError::prediction(e.to_string()))?;
        let classifier = &self.pair.classifier;
        let probabilities = classifier
            .predict_proba(&features)
            .map_err(|e| CredenceError::prediction(e.to_string()))?;
        let label = classifier
            .predict(&features)
            .map_err(|e| CredenceError::prediction(e.to_string()))?;

        debug!(
            "Classified {} normalized chars ({} active features) as {label}",
            normalized.len(),
            features.nnz()
        );
        Ok(Verdict::Judged(Prediction::new(label, probabilities)))
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.pair.classifier.metadata()
    }

    pub fn pair(&self) -> &ArtifactPair {
        &self.pair
    }
}
