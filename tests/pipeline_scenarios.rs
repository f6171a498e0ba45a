use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use credence::artifact::ArtifactStore;
use credence::config::{ArtifactConfig, PipelineConfig};
use credence::dataset::{DatasetLoader, Label};
use credence::error::Result;
use credence::ml::Classifier;
use credence::pipeline::{TrainingPipeline, TrainingSummary};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn config_for(model_dir: &Path) -> PipelineConfig {
    PipelineConfig::default()
        .with_data_dir(fixture_dir())
        .with_model_dir(model_dir)
}

fn train_into(model_dir: &Path) -> Result<(PipelineConfig, TrainingSummary)> {
    let config = config_for(model_dir);
    let summary = TrainingPipeline::new(config.clone())
        .with_progress(false)
        .run()?;
    Ok((config, summary))
}

#[test]
fn training_pipeline_runs_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let (config, summary) = train_into(&dir.path().join("models"))?;

    assert_eq!(summary.n_records, 60);
    assert_eq!(summary.n_fake, 30);
    assert_eq!(summary.n_real, 30);
    assert_eq!(summary.n_test, 12);
    assert_eq!(summary.n_train, 48);
    assert!(summary.vocabulary_size > 0);
    assert!(summary.training_stats.iterations >= 1);
    assert!(summary.report.accuracy >= 0.9, "accuracy {}", summary.report.accuracy);
    assert_eq!(summary.report.n_samples, 12);

    assert!(config.artifacts.model_path.is_file());
    assert!(config.artifacts.vectorizer_path.is_file());
    Ok(())
}

#[test]
fn persisted_model_carries_evaluation_metrics() -> Result<()> {
    let dir = TempDir::new()?;
    let (config, summary) = train_into(dir.path())?;

    let pair = ArtifactStore::from_config(&config.artifacts)
        .load()?
        .expect("artifacts were just saved");
    let metadata = pair.classifier.metadata();
    assert_eq!(metadata.training_examples, summary.n_train);
    assert_eq!(metadata.n_features, pair.vectorizer.vocabulary_size());
    assert_eq!(metadata.validation_metrics["accuracy"], summary.report.accuracy);
    assert!(metadata.validation_metrics.contains_key("fake_f1"));
    Ok(())
}

#[test]
fn training_is_reproducible_and_overwrites_artifacts() -> Result<()> {
    let dir = TempDir::new()?;
    let (config, first) = train_into(dir.path())?;
    let store = ArtifactStore::from_config(&config.artifacts);
    let before = store.load()?.expect("first run saved artifacts");

    let (_, second) = train_into(dir.path())?;
    let after = store.load()?.expect("second run saved artifacts");

    assert_eq!(first.report, second.report);
    assert_eq!(before.vectorizer, after.vectorizer);
    assert_eq!(before.classifier.coefficients(), after.classifier.coefficients());
    assert_eq!(before.classifier.intercept(), after.classifier.intercept());
    Ok(())
}

#[test]
fn artifact_round_trip_preserves_predictions() -> Result<()> {
    let dir = TempDir::new()?;
    let (config, _) = train_into(&dir.path().join("a"))?;
    let original = ArtifactStore::from_config(&config.artifacts)
        .load()?
        .expect("artifacts were just saved");

    let copy_store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path().join("b")));
    copy_store.save(&original)?;
    let copy = copy_store.load()?.expect("copy was just saved");

    let samples = [
        "senate budget committee voted tax reform",
        "breaking shocking video watch mainstream media",
        "officials said statement sunday",
        "completely unrelated words",
    ];
    let features = original.vectorizer.transform(&samples)?;
    let copy_features = copy.vectorizer.transform(&samples)?;
    assert_eq!(features, copy_features);
    for x in &features {
        assert_eq!(original.classifier.predict(x)?, copy.classifier.predict(x)?);
        assert_eq!(
            original.classifier.predict_proba(x)?,
            copy.classifier.predict_proba(x)?
        );
    }
    Ok(())
}

#[test]
fn dataset_loader_is_deterministic() -> Result<()> {
    let dir = fixture_dir();
    let loader = DatasetLoader::new(dir.join("Fake.csv"), dir.join("True.csv"));

    let first = loader.load()?;
    let second = loader.load()?;
    assert_eq!(first.records(), second.records());
    assert_eq!(first.count(Label::Fake), 30);
    assert_eq!(first.count(Label::Real), 30);

    let reseeded = loader.clone().with_seed(7).load()?;
    assert_ne!(first.records(), reseeded.records());
    Ok(())
}

#[test]
fn missing_source_aborts_at_load_stage() -> Result<()> {
    let data = TempDir::new()?;
    fs::copy(fixture_dir().join("Fake.csv"), data.path().join("Fake.csv"))?;
    let models = TempDir::new()?;

    let config = PipelineConfig::default()
        .with_data_dir(data.path())
        .with_model_dir(models.path());
    let err = TrainingPipeline::new(config.clone())
        .with_progress(false)
        .run()
        .unwrap_err();

    assert!(err.is_load_error());
    assert!(err.to_string().contains("LOAD stage failed"));
    assert!(!config.artifacts.model_path.exists());
    assert!(!config.artifacts.vectorizer_path.exists());
    Ok(())
}

#[test]
fn missing_text_column_is_a_load_error() -> Result<()> {
    let data = TempDir::new()?;
    fs::write(data.path().join("Fake.csv"), "title,body\nA,b\n")?;
    fs::write(data.path().join("True.csv"), "title,text\nA,b\n")?;

    let config = PipelineConfig::default()
        .with_data_dir(data.path())
        .with_model_dir(data.path().join("models"));
    let err = TrainingPipeline::new(config)
        .with_progress(false)
        .run()
        .unwrap_err();
    assert!(err.is_load_error());
    Ok(())
}
