//! Error types for the Credence library.
//!
//! All fallible operations return [`CredenceError`]. Variants follow the
//! lifecycle of a model: loading data or artifacts, fitting, and serving.
//!
//! Note that "insufficient input" is not represented here. An article that
//! carries no usable words is a first-class outcome of inference, see
//! [`crate::inference::Verdict`].
//!
//! # Examples
//!
//! ```
//! use credence::error::{CredenceError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CredenceError::load("data/raw/Fake.csv does not exist"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Credence operations.
#[derive(Error, Debug)]
pub enum CredenceError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A dataset or artifact file is missing, unreadable or malformed.
    #[error("Load error: {0}")]
    Load(String),

    /// The vectorizer was used before `fit_transform`.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Failure on the vectorize/predict path at inference time.
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Invalid or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Training could not proceed on the given data.
    #[error("Training error: {0}")]
    Training(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A training pipeline stage aborted the run.
    #[error("{stage} stage failed: {source}")]
    StageFailed {
        stage: String,
        #[source]
        source: Box<CredenceError>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CredenceError.
pub type Result<T> = std::result::Result<T, CredenceError>;

impl CredenceError {
    /// Create a new load error.
    pub fn load<S: Into<String>>(msg: S) -> Self {
        CredenceError::Load(msg.into())
    }

    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        CredenceError::NotFitted(msg.into())
    }

    /// Create a new prediction error.
    pub fn prediction<S: Into<String>>(msg: S) -> Self {
        CredenceError::Prediction(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CredenceError::Config(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        CredenceError::Training(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CredenceError::Serialization(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        CredenceError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        CredenceError::Other(msg.into())
    }

    /// Attach the name of the pipeline stage that produced this error.
    pub fn at_stage<S: Into<String>>(self, stage: S) -> Self {
        CredenceError::StageFailed {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error means a required file could not be loaded.
    pub fn is_load_error(&self) -> bool {
        match self {
            CredenceError::Load(_) => true,
            CredenceError::StageFailed { source, .. } => source.is_load_error(),
            _ => false,
        }
    }
}
