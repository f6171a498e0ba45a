//! Command line argument parsing for the Credence CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Credence - fake news detection with TF-IDF and logistic regression
#[derive(Parser, Debug, Clone)]
#[command(name = "credence")]
#[command(about = "Train and serve a TF-IDF fake news classifier")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CredenceArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CredenceArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the training pipeline and save the model artifacts
    Train(TrainArgs),

    /// Classify article text with the saved model
    Predict(PredictArgs),

    /// Show metadata of the saved model
    Inspect(InspectArgs),
}

/// Configuration file and artifact location shared by all commands.
#[derive(Parser, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Pipeline configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", env = "CREDENCE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding best_model.bin and tfidf_vectorizer.bin
    #[arg(long, value_name = "DIR")]
    pub model_dir: Option<PathBuf>,
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Directory holding Fake.csv and True.csv
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Fraction of rows held out for evaluation
    #[arg(long)]
    pub test_ratio: Option<f64>,

    /// Seed for shuffling, splitting and training
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Article text; one article per stdin line when omitted
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

/// Arguments for model inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of most indicative terms to show per label
    #[arg(short = 'n', long, default_value = "10")]
    pub top_terms: usize,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        // Default verbosity
        let args = CredenceArgs::try_parse_from(["credence", "train"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        // Multiple verbose flags
        let args = CredenceArgs::try_parse_from(["credence", "-vv", "train"]).unwrap();
        assert_eq!(args.verbosity(), 2);

        // Quiet flag
        let args = CredenceArgs::try_parse_from(["credence", "train", "--quiet"]).unwrap();
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_output_format() {
        let args =
            CredenceArgs::try_parse_from(["credence", "--format", "json", "inspect"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn test_train_overrides() {
        let args = CredenceArgs::try_parse_from([
            "credence",
            "train",
            "--data-dir",
            "/data/news",
            "--model-dir",
            "/srv/models",
            "--test-ratio",
            "0.25",
        ])
        .unwrap();

        if let Command::Train(train) = args.command {
            assert_eq!(train.data_dir, Some(PathBuf::from("/data/news")));
            assert_eq!(train.config.model_dir, Some(PathBuf::from("/srv/models")));
            assert_eq!(train.test_ratio, Some(0.25));
        } else {
            panic!("Expected Train command");
        }
    }

    #[test]
    fn test_predict_text_is_optional() {
        let args = CredenceArgs::try_parse_from(["credence", "predict"]).unwrap();
        if let Command::Predict(predict) = args.command {
            assert!(predict.text.is_none());
        } else {
            panic!("Expected Predict command");
        }

        let args = CredenceArgs::try_parse_from(["credence", "predict", "Stocks rose"]).unwrap();
        if let Command::Predict(predict) = args.command {
            assert_eq!(predict.text.as_deref(), Some("Stocks rose"));
        } else {
            panic!("Expected Predict command");
        }
    }
}
