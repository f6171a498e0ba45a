//! Output formatting for CLI commands.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cli::args::{CredenceArgs, OutputFormat};
use crate::dataset::Label;
use crate::error::Result;
use crate::inference::{InsufficientReason, Verdict};
use crate::pipeline::TrainingSummary;

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub records: usize,
    pub fake_records: usize,
    pub real_records: usize,
    pub vocabulary_size: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub epochs: usize,
    pub early_stopped: bool,
    pub final_loss: f64,
    pub accuracy: f64,
    pub macro_f1: f64,
    pub model_path: String,
    pub vectorizer_path: String,
    pub duration_ms: u64,
}

impl From<&TrainingSummary> for TrainingResult {
    fn from(summary: &TrainingSummary) -> Self {
        Self {
            records: summary.n_records,
            fake_records: summary.n_fake,
            real_records: summary.n_real,
            vocabulary_size: summary.vocabulary_size,
            train_samples: summary.n_train,
            test_samples: summary.n_test,
            epochs: summary.training_stats.iterations,
            early_stopped: summary.training_stats.early_stopped,
            final_loss: summary.training_stats.final_training_loss,
            accuracy: summary.report.accuracy,
            macro_f1: summary.report.macro_avg.f1,
            model_path: summary.model_path.display().to_string(),
            vectorizer_path: summary.vectorizer_path.display().to_string(),
            duration_ms: summary.elapsed_ms,
        }
    }
}

impl fmt::Display for TrainingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Records:      {} ({} fake, {} real)",
            self.records, self.fake_records, self.real_records
        )?;
        writeln!(f, "Vocabulary:   {} terms", self.vocabulary_size)?;
        writeln!(
            f,
            "Split:        {} train / {} test",
            self.train_samples, self.test_samples
        )?;
        writeln!(
            f,
            "Training:     {} epochs{}, final loss {:.6}",
            self.epochs,
            if self.early_stopped { " (converged)" } else { "" },
            self.final_loss
        )?;
        writeln!(
            f,
            "Accuracy:     {:.2}% (macro F1 {:.4})",
            self.accuracy * 100.0,
            self.macro_f1
        )?;
        writeln!(f, "Model:        {}", self.model_path)?;
        writeln!(f, "Vectorizer:   {}", self.vectorizer_path)?;
        write!(f, "Duration:     {} ms", self.duration_ms)
    }
}

/// Result structure for one classified article.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResult {
    /// `judged` or `insufficient_input`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Confidence in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InsufficientReason>,
}

impl From<Verdict> for PredictionResult {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Judged(prediction) => Self {
                outcome: "judged".to_string(),
                label: Some(prediction.label),
                confidence: Some(prediction.confidence),
                probabilities: Some(
                    Label::ALL
                        .iter()
                        .map(|&l| (l.as_str().to_string(), prediction.probability(l)))
                        .collect(),
                ),
                reason: None,
            },
            Verdict::InsufficientInput(reason) => Self {
                outcome: "insufficient_input".to_string(),
                label: None,
                confidence: None,
                probabilities: None,
                reason: Some(reason),
            },
        }
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.label, self.confidence, self.reason) {
            (Some(label), Some(confidence), _) => {
                write!(f, "{label} (confidence: {confidence:.2}%)")
            }
            (_, _, Some(reason)) => write!(f, "Cannot judge: {reason}"),
            _ => write!(f, "{}", self.outcome),
        }
    }
}

/// Persisted model information.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub trained_at: String,
    pub training_examples: usize,
    pub n_features: usize,
    pub vocabulary_size: usize,
    pub hyperparameters: BTreeMap<String, f64>,
    pub validation_metrics: BTreeMap<String, f64>,
    pub top_fake_terms: Vec<(String, f64)>,
    pub top_real_terms: Vec<(String, f64)>,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model:              {} (credence {})", self.name, self.version)?;
        writeln!(f, "Trained at:         {}", self.trained_at)?;
        writeln!(f, "Training examples:  {}", self.training_examples)?;
        writeln!(f, "Features:           {}", self.n_features)?;
        writeln!(f, "Vocabulary size:    {}", self.vocabulary_size)?;

        writeln!(f, "\nHyperparameters:")?;
        for (name, value) in &self.hyperparameters {
            writeln!(f, "  {name:<20} {value}")?;
        }

        writeln!(f, "\nHeld-out metrics:")?;
        for (name, value) in &self.validation_metrics {
            writeln!(f, "  {name:<20} {value:.4}")?;
        }

        write_terms(f, "FAKE", &self.top_fake_terms)?;
        write_terms(f, "REAL", &self.top_real_terms)
    }
}

fn write_terms(f: &mut fmt::Formatter<'_>, label: &str, terms: &[(String, f64)]) -> fmt::Result {
    if terms.is_empty() {
        return Ok(());
    }
    writeln!(f, "\nMost indicative of {label}:")?;
    for (term, weight) in terms {
        writeln!(f, "  {term:<20} {weight:+.4}")?;
    }
    Ok(())
}

/// Output a result in the specified format.
pub fn output_result<T>(result: &T, args: &CredenceArgs) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    println!("{}", render(result, args.output_format, args.pretty)?);
    Ok(())
}

/// Render a result as human-readable text or JSON.
pub fn render<T>(result: &T, format: OutputFormat, pretty: bool) -> Result<String>
where
    T: Serialize + fmt::Display,
{
    Ok(match format {
        OutputFormat::Human => result.to_string(),
        OutputFormat::Json if pretty => serde_json::to_string_pretty(result)?,
        OutputFormat::Json => serde_json::to_string(result)?,
    })
}
