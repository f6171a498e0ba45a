//! Command implementations for the Credence CLI.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use log::{error, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::dataset::Label;
use crate::error::Result;
use crate::inference::{InferenceService, Verdict};
use crate::pipeline::TrainingPipeline;

/// Execute a CLI command.
pub fn execute_command(args: CredenceArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args, &args),
        Command::Predict(predict_args) => predict(predict_args, &args),
        Command::Inspect(inspect_args) => inspect_model(inspect_args, &args),
    }
}

/// Resolve the pipeline configuration from an optional file and CLI overrides.
pub fn load_config(args: &ConfigArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path).with_context(|| {
            format!("failed to load configuration from {}", path.display())
        })?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &args.model_dir {
        config = config.with_model_dir(dir);
    }
    Ok(config)
}

/// Run the training pipeline.
fn train_model(args: &TrainArgs, cli_args: &CredenceArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(dir) = &args.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(ratio) = args.test_ratio {
        config.split.test_ratio = ratio;
    }
    if let Some(seed) = args.seed {
        config.data.shuffle_seed = seed;
        config.split.seed = seed;
        config.classifier.seed = seed;
    }
    config.validate()?;

    info!(
        "Training from {} and {}",
        config.data.fake_path.display(),
        config.data.real_path.display()
    );

    let progress = cli_args.output_format == OutputFormat::Human && cli_args.verbosity() > 0;
    let summary = TrainingPipeline::new(config).with_progress(progress).run()?;

    output_result(&TrainingResult::from(&summary), cli_args)
}

/// Classify the given text, or every stdin line when no text is given.
fn predict(args: &PredictArgs, cli_args: &CredenceArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let service = InferenceService::open(&config.artifacts)?;

    if let Some(text) = &args.text {
        let verdict = service.classify(text)?;
        return output_result(&PredictionResult::from(verdict), cli_args);
    }

    let stdin = io::stdin();
    let stats = serve_lines(&service, stdin.lock(), |verdict| {
        output_result(&PredictionResult::from(verdict), cli_args)?;
        io::stdout().flush()?;
        Ok(())
    })?;
    info!("Served {} predictions ({} failed)", stats.served, stats.failed);
    Ok(())
}

/// Per-session counters for the line-serving loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServeStats {
    pub served: usize,
    pub failed: usize,
}

/// Classify every line of `input`, handing each verdict to `emit`.
///
/// Lines are decoded lossily, so bytes that are not valid UTF-8 become
/// U+FFFD and the line is still classified. A failed request is logged and
/// counted; only a read error on `input` or an `emit` failure ends the loop.
pub fn serve_lines<R, F>(
    service: &InferenceService,
    mut input: R,
    mut emit: F,
) -> Result<ServeStats>
where
    R: BufRead,
    F: FnMut(Verdict) -> Result<()>,
{
    let mut stats = ServeStats::default();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        match service.classify(line) {
            Ok(verdict) => {
                emit(verdict)?;
                stats.served += 1;
            }
            Err(e) => {
                error!("Prediction failed: {e}");
                eprintln!("Error: {e}");
                stats.failed += 1;
            }
        }
    }
    Ok(stats)
}

/// Show the persisted model's metadata and most indicative terms.
fn inspect_model(args: &InspectArgs, cli_args: &CredenceArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let service = InferenceService::open(&config.artifacts)?;
    let pair = service.pair();
    let metadata = service.metadata();
    let terms = pair.vectorizer.terms();

    let top_terms = |label: Label| -> Vec<(String, f64)> {
        pair.classifier
            .top_features(label, args.top_terms)
            .into_iter()
            .filter_map(|(index, weight)| terms.get(index).map(|t| (t.to_string(), weight)))
            .collect()
    };

    let info = ModelInfo {
        name: metadata.name.clone(),
        version: metadata.version.clone(),
        trained_at: metadata.trained_at.to_rfc3339(),
        training_examples: metadata.training_examples,
        n_features: metadata.n_features,
        vocabulary_size: pair.vectorizer.vocabulary_size(),
        hyperparameters: metadata.hyperparameters.clone(),
        validation_metrics: metadata.validation_metrics.clone(),
        top_fake_terms: top_terms(Label::Fake),
        top_real_terms: top_terms(Label::Real),
    };

    output_result(&info, cli_args)
}
