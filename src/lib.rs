//! # Credence
//!
//! A fake news classifier built on TF-IDF features and logistic regression.
//!
//! ## Features
//!
//! - Text normalization pipeline tuned for newswire articles
//! - Deterministic training: loading, vectorizing, splitting and fitting are all seeded
//! - Held-out evaluation with per-class precision, recall and F1
//! - Checksummed artifact files, always saved and loaded as a pair
//! - An inference service that can be shared across request handlers
//!
//! ## Example
//!
//! ```no_run
//! use credence::config::PipelineConfig;
//! use credence::inference::InferenceService;
//! use credence::pipeline::TrainingPipeline;
//!
//! let config = PipelineConfig::default();
//! TrainingPipeline::new(config.clone()).run().unwrap();
//!
//! let service = InferenceService::open(&config.artifacts).unwrap();
//! let verdict = service.classify("BREAKING: you won't believe this video").unwrap();
//! println!("{:?}", verdict.label());
//! ```

pub mod analysis;
pub mod artifact;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod ml;
pub mod pipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
