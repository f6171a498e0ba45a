use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

use credence::error::Result;

const PROGRESS: [&str; 8] = [
    "Loading data...",
    "Cleaning text...",
    "Building features...",
    "Splitting train/test sets...",
    "Training model...",
    "Evaluating model...",
    "Saving model...",
    "Training complete!",
];

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn credence_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_credence"));
    cmd.env_remove("CREDENCE_CONFIG").env_remove("CREDENCE_LOG");
    cmd
}

fn train_cmd(data_dir: &Path, model_dir: &Path) -> Command {
    let mut cmd = credence_cmd();
    cmd.arg("train")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--model-dir")
        .arg(model_dir);
    cmd
}

fn trained_models() -> Result<TempDir> {
    let models = TempDir::new()?;
    train_cmd(&fixtures(), models.path()).assert().success();
    Ok(models)
}

#[test]
fn train_prints_every_stage_and_exits_zero() -> Result<()> {
    let models = TempDir::new()?;
    let assert = train_cmd(&fixtures(), models.path()).assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let mut rest = stdout.as_str();
    for message in PROGRESS {
        let at = rest
            .find(message)
            .unwrap_or_else(|| panic!("{message:?} missing or out of order in:\n{stdout}"));
        rest = &rest[at + message.len()..];
    }
    assert!(models.path().join("best_model.bin").is_file());
    assert!(models.path().join("tfidf_vectorizer.bin").is_file());
    Ok(())
}

#[test]
fn train_with_missing_data_exits_non_zero() -> Result<()> {
    let models = TempDir::new()?;
    let assert = train_cmd(&models.path().join("nonexistent"), models.path())
        .assert()
        .failure();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    assert!(stdout.contains("Loading data..."));
    assert!(!stdout.contains("Training complete!"));
    assert!(!models.path().join("best_model.bin").exists());
    Ok(())
}

#[test]
fn predict_without_model_exits_non_zero() -> Result<()> {
    let models = TempDir::new()?;
    credence_cmd()
        .args(["predict", "senate budget vote", "--model-dir"])
        .arg(models.path())
        .assert()
        .failure()
        .stdout("");
    Ok(())
}

#[test]
fn predict_serves_every_stdin_line() -> Result<()> {
    let models = trained_models()?;
    let assert = credence_cmd()
        .arg("predict")
        .arg("--model-dir")
        .arg(models.path())
        .write_stdin(&b"senate budget vote\ncaf\xe9 shocking video\n\nwatch the shocking video\n"[..])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4, "unexpected output:\n{stdout}");
    assert!(lines[0].starts_with("REAL (confidence: "));
    assert!(lines[1].starts_with("FAKE (confidence: "));
    assert!(lines[2].starts_with("Cannot judge: "));
    assert!(lines[3].starts_with("FAKE (confidence: "));
    Ok(())
}

#[test]
fn predict_json_output() -> Result<()> {
    let models = trained_models()?;
    let assert = credence_cmd()
        .args(["--format", "json", "predict", "watch the shocking video", "--model-dir"])
        .arg(models.path())
        .assert()
        .success();

    let value: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(value["label"], "FAKE");
    assert_eq!(value["outcome"], "judged");
    Ok(())
}
