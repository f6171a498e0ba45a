//! Labeled news datasets.
//!
//! Two raw corpora, one per class, are merged into a single
//! [`LabeledDataset`] by the [`loader`], then cut into train and test rows
//! by [`split`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CredenceError, Result};

pub mod loader;
pub mod split;

pub use loader::DatasetLoader;
pub use split::{TrainTestSplit, train_test_split};

/// Binary credibility label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// Credible news (class 0).
    Real,
    /// Fabricated or unreliable news (class 1).
    Fake,
}

impl Label {
    /// Both labels in class-index order.
    pub const ALL: [Label; 2] = [Label::Real, Label::Fake];

    /// The class index: 0 for real, 1 for fake.
    pub fn index(self) -> usize {
        match self {
            Label::Real => 0,
            Label::Fake => 1,
        }
    }

    /// The label for a class index.
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Label::Real),
            1 => Ok(Label::Fake),
            other => Err(CredenceError::other(format!("no label for class {other}"))),
        }
    }

    /// Human-facing name.
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Real => "REAL",
            Label::Fake => "FAKE",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One article and its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub text: String,
    pub label: Label,
}

/// Merged, shuffled and densely indexed records from both corpora.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledDataset {
    records: Vec<NewsRecord>,
}

impl LabeledDataset {
    /// Wrap records in their current order.
    pub fn new(records: Vec<NewsRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[NewsRecord] {
        &self.records
    }

    /// Row `index` of the dataset.
    pub fn get(&self, index: usize) -> Option<&NewsRecord> {
        self.records.get(index)
    }

    /// Article bodies in row order.
    pub fn texts(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.text.as_str()).collect()
    }

    /// Labels in row order.
    pub fn labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }

    /// Number of records carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.records.iter().filter(|r| r.label == label).count()
    }
}
