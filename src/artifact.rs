//! Persistence of the trained classifier and its vectorizer.
//!
//! The two artifacts are only ever saved and loaded together as an
//! [`ArtifactPair`]. Each is written to its own file using the framing in
//! [`frame`], to a sibling temporary file first and then renamed into place.

pub mod frame;

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ArtifactConfig;
use crate::error::{CredenceError, Result};
use crate::ml::logistic::LogisticRegression;
use crate::ml::tfidf::TfIdfVectorizer;

use self::frame::{ArtifactKind, read_frame, write_frame};

/// A trained classifier and the vectorizer whose vocabulary it was trained on.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPair {
    pub classifier: LogisticRegression,
    pub vectorizer: TfIdfVectorizer,
}

impl ArtifactPair {
    pub fn new(classifier: LogisticRegression, vectorizer: TfIdfVectorizer) -> Self {
        Self {
            classifier,
            vectorizer,
        }
    }

    /// Whether the classifier's feature dimension matches the vectorizer's vocabulary.
    pub fn is_consistent(&self) -> bool {
        self.classifier.is_trained()
            && self.vectorizer.is_fitted()
            && self.classifier.n_features() == self.vectorizer.vocabulary_size()
    }
}

/// Reads and writes an [`ArtifactPair`] at two fixed paths.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_path: PathBuf,
    vectorizer_path: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(model_path: P, vectorizer_path: Q) -> Self {
        Self {
            model_path: model_path.into(),
            vectorizer_path: vectorizer_path.into(),
        }
    }

    pub fn from_config(config: &ArtifactConfig) -> Self {
        Self::new(&config.model_path, &config.vectorizer_path)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn vectorizer_path(&self) -> &Path {
        &self.vectorizer_path
    }

    /// Whether both artifact files are present.
    pub fn exists(&self) -> bool {
        self.model_path.is_file() && self.vectorizer_path.is_file()
    }

    /// Persist both artifacts, replacing any previous pair.
    ///
    /// Both files are fully written before either is moved into place. If the
    /// first rename fails the previous pair is untouched. If the second fails
    /// the new classifier sits next to the old vectorizer; the returned error
    /// says so and the pair must be retrained before serving. Temporary files
    /// are removed on every failure path.
    pub fn save(&self, pair: &ArtifactPair) -> Result<()> {
        let model_tmp = write_temp(&self.model_path, ArtifactKind::Classifier, &pair.classifier)?;
        let vectorizer_tmp = match write_temp(
            &self.vectorizer_path,
            ArtifactKind::Vectorizer,
            &pair.vectorizer,
        ) {
            Ok(path) => path,
            Err(e) => {
                remove_temps(&[&model_tmp]);
                return Err(e);
            }
        };

        if let Err(e) = fs::rename(&model_tmp, &self.model_path) {
            remove_temps(&[&model_tmp, &vectorizer_tmp]);
            return Err(CredenceError::Io(e));
        }
        if let Err(e) = fs::rename(&vectorizer_tmp, &self.vectorizer_path) {
            remove_temps(&[&vectorizer_tmp]);
            error!(
                "{} was replaced but {} was not; the saved pair is mismatched",
                self.model_path.display(),
                self.vectorizer_path.display()
            );
            return Err(CredenceError::serialization(format!(
                "cannot move vectorizer into {}: {e}; {} is now mismatched with it, retrain",
                self.vectorizer_path.display(),
                self.model_path.display()
            )));
        }

        info!(
            "Saved classifier to {} and vectorizer to {}",
            self.model_path.display(),
            self.vectorizer_path.display()
        );
        Ok(())
    }

    /// Load the pair. Returns `None` if either file is absent.
    pub fn load(&self) -> Result<Option<ArtifactPair>> {
        for path in [&self.model_path, &self.vectorizer_path] {
            if !path.exists() {
                warn!("Artifact {} is missing", path.display());
                return Ok(None);
            }
        }

        let classifier: LogisticRegression =
            read_artifact(&self.model_path, ArtifactKind::Classifier)?;
        let vectorizer: TfIdfVectorizer =
            read_artifact(&self.vectorizer_path, ArtifactKind::Vectorizer)?;
        vectorizer.validate().map_err(|e| {
            CredenceError::load(format!("{}: {e}", self.vectorizer_path.display()))
        })?;

        debug!(
            "Loaded artifact pair: {} features, {} vocabulary terms",
            classifier.n_features(),
            vectorizer.vocabulary_size()
        );
        Ok(Some(ArtifactPair::new(classifier, vectorizer)))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_temps<P: AsRef<Path>>(paths: &[P]) {
    for path in paths.iter().map(AsRef::as_ref) {
        if let Err(e) = fs::remove_file(path) {
            warn!("Cannot remove temporary file {}: {e}", path.display());
        }
    }
}

fn write_temp<T: Serialize>(path: &Path, kind: ArtifactKind, value: &T) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let payload = bincode::serialize(value).map_err(|e| {
        CredenceError::serialization(format!("cannot encode {}: {e}", kind.name()))
    })?;

    let tmp = temp_path(path);
    let file = File::create(&tmp)?;
    let mut writer = BufWriter::new(file);
    write_frame(&mut writer, kind, &payload)?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| CredenceError::Io(e.into_error()))?
        .sync_all()?;

    debug!(
        "Wrote {} bytes of {} payload to {}",
        payload.len(),
        kind.name(),
        tmp.display()
    );
    Ok(tmp)
}

fn read_artifact<T: DeserializeOwned>(path: &Path, kind: ArtifactKind) -> Result<T> {
    let file = File::open(path).map_err(|e| {
        CredenceError::load(format!("cannot open {}: {e}", path.display()))
    })?;
    let payload = read_frame(&mut BufReader::new(file), kind)
        .map_err(|e| CredenceError::load(format!("{}: {e}", path.display())))?;
    bincode::deserialize(&payload).map_err(|e| {
        CredenceError::load(format!(
            "cannot decode {} from {}: {e}",
            kind.name(),
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::dataset::Label;
    use crate::ml::models::Classifier;

    fn trained_pair() -> ArtifactPair {
        let docs = [
            "senate budget vote",
            "shocking video watch",
            "congress budget talks",
            "watch shocking clip",
        ];
        let labels = [Label::Real, Label::Fake, Label::Real, Label::Fake];
        let mut vectorizer = TfIdfVectorizer::default();
        let features = vectorizer.fit_transform(&docs).unwrap();
        let mut classifier = LogisticRegression::default();
        classifier.fit(&features, &labels).unwrap();
        ArtifactPair::new(classifier, vectorizer)
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path().join("models")));
        let pair = trained_pair();
        assert!(pair.is_consistent());

        store.save(&pair).unwrap();
        assert!(store.exists());
        assert!(!temp_path(store.model_path()).exists());

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, pair);

        let v = loaded.vectorizer.transform_one("budget video").unwrap();
        assert_eq!(
            loaded.classifier.predict_proba(&v).unwrap(),
            pair.classifier.predict_proba(&v).unwrap()
        );
    }

    #[test]
    fn test_missing_artifact_is_none() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        assert!(store.load().unwrap().is_none());

        store.save(&trained_pair()).unwrap();
        fs::remove_file(store.vectorizer_path()).unwrap();
        assert!(!store.exists());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        fs::write(store.model_path(), b"stale").unwrap();

        let pair = trained_pair();
        store.save(&pair).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), pair);
    }

    #[test]
    fn test_corrupt_artifact_is_load_error() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        store.save(&trained_pair()).unwrap();

        let mut bytes = fs::read(store.model_path()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x55;
        fs::write(store.model_path(), bytes).unwrap();

        let err = store.load().unwrap_err();
        assert!(err.is_load_error());
    }

    #[test]
    fn test_swapped_files_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        store.save(&trained_pair()).unwrap();

        let swapped = ArtifactStore::new(store.vectorizer_path(), store.model_path());
        assert!(swapped.load().unwrap_err().is_load_error());
    }

    #[test]
    fn test_failed_first_rename_keeps_previous_pair() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        fs::create_dir(store.model_path()).unwrap();
        fs::write(store.model_path().join("keep"), b"x").unwrap();

        assert!(store.save(&trained_pair()).is_err());
        assert!(!temp_path(store.model_path()).exists());
        assert!(!temp_path(store.vectorizer_path()).exists());
        assert!(!store.vectorizer_path().exists());
    }

    #[test]
    fn test_failed_second_rename_reports_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        fs::create_dir(store.vectorizer_path()).unwrap();
        fs::write(store.vectorizer_path().join("keep"), b"x").unwrap();

        let err = store.save(&trained_pair()).unwrap_err();
        assert!(err.to_string().contains("mismatched"));
        assert!(store.model_path().is_file());
        assert!(!temp_path(store.model_path()).exists());
        assert!(!temp_path(store.vectorizer_path()).exists());
    }

    #[test]
    fn test_crafted_vectorizer_is_load_error() {
        use std::collections::HashMap;

        use crate::config::VectorizerConfig;

        // Same field layout as the vectorizer, with an index past the idf table.
        #[derive(Serialize)]
        struct Vocabulary {
            vocabulary: HashMap<String, usize>,
            idf: Vec<f64>,
            n_documents: usize,
        }
        #[derive(Serialize)]
        struct Vectorizer {
            config: VectorizerConfig,
            fitted: Option<Vocabulary>,
        }

        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::from_config(&ArtifactConfig::in_dir(dir.path()));
        store.save(&trained_pair()).unwrap();

        let crafted = Vectorizer {
            config: VectorizerConfig::default(),
            fitted: Some(Vocabulary {
                vocabulary: HashMap::from([("budget".to_string(), 7)]),
                idf: vec![1.0],
                n_documents: 4,
            }),
        };
        let payload = bincode::serialize(&crafted).unwrap();
        let mut file = File::create(store.vectorizer_path()).unwrap();
        write_frame(&mut file, ArtifactKind::Vectorizer, &payload).unwrap();
        drop(file);

        let err = store.load().unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("out of range"));
    }
}
