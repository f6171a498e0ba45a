//! CSV dataset loader.
//!
//! Reads the fake-labelled and real-labelled corpora, tags every row with its
//! source label, concatenates them (fake first) and shuffles the result with
//! a fixed seed. Columns other than the text column are ignored:
//!
//! ```csv
//! title,text,subject,date
//! "Senate passes bill","WASHINGTON (Reuters) - The Senate ...",politicsNews,"December 1, 2017"
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::DataConfig;
use crate::dataset::{Label, LabeledDataset, NewsRecord};
use crate::error::{CredenceError, Result};

/// Loads and merges the two labelled corpora.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    fake_path: PathBuf,
    real_path: PathBuf,
    text_column: String,
    seed: u64,
}

impl DatasetLoader {
    /// Create a loader for the given sources.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(fake_path: P, real_path: Q) -> Self {
        let defaults = DataConfig::default();
        Self {
            fake_path: fake_path.into(),
            real_path: real_path.into(),
            text_column: defaults.text_column,
            seed: defaults.shuffle_seed,
        }
    }

    /// Create a loader from configuration.
    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            fake_path: config.fake_path.clone(),
            real_path: config.real_path.clone(),
            text_column: config.text_column.clone(),
            seed: config.shuffle_seed,
        }
    }

    /// Set the name of the text column.
    pub fn with_text_column<S: Into<String>>(mut self, column: S) -> Self {
        self.text_column = column.into();
        self
    }

    /// Set the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Read both sources and return the merged, shuffled dataset.
    pub fn load(&self) -> Result<LabeledDataset> {
        let mut records = self.read_corpus(&self.fake_path, Label::Fake)?;
        let fake_count = records.len();
        records.extend(self.read_corpus(&self.real_path, Label::Real)?);
        let real_count = records.len() - fake_count;

        let mut rng = StdRng::seed_from_u64(self.seed);
        records.shuffle(&mut rng);

        info!(
            "Loaded {} records ({} fake, {} real), shuffled with seed {}",
            records.len(),
            fake_count,
            real_count,
            self.seed
        );

        Ok(LabeledDataset::new(records))
    }

    /// Read one corpus, tagging every row with `label`.
    pub fn read_corpus(&self, path: &Path, label: Label) -> Result<Vec<NewsRecord>> {
        if !path.exists() {
            return Err(CredenceError::load(format!(
                "{} dataset {} does not exist",
                label,
                path.display()
            )));
        }

        let file = File::open(path).map_err(|e| {
            CredenceError::load(format!("cannot open {}: {e}", path.display()))
        })?;

        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| {
                CredenceError::load(format!(
                    "failed to read CSV header of {}: {e}",
                    path.display()
                ))
            })?
            .clone();

        let text_index = headers
            .iter()
            .position(|h| h.trim() == self.text_column)
            .ok_or_else(|| {
                CredenceError::load(format!(
                    "{} has no '{}' column",
                    path.display(),
                    self.text_column
                ))
            })?;

        let mut records = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                CredenceError::load(format!(
                    "malformed row {} in {}: {e}",
                    row + 1,
                    path.display()
                ))
            })?;
            let text = record.get(text_index).unwrap_or_default().to_string();
            records.push(NewsRecord { text, label });
        }

        debug!("Read {} {} records from {}", records.len(), label, path.display());

        Ok(records)
    }
}
