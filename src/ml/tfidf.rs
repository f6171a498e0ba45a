//! TF-IDF vectorizer for normalized article text.
//!
//! The vectorizer has two states. A new vectorizer is unfit; a single call
//! to [`TfIdfVectorizer::fit_transform`] builds the vocabulary and idf
//! weights and moves it to the fit state for good. Only a fit vectorizer can
//! [`transform`](TfIdfVectorizer::transform), and every vector it produces
//! has the dimension fixed at fit time.
//!
//! Input is expected to be the output of
//! [`TextNormalizer`](crate::analysis::analyzer::normalizer::TextNormalizer):
//! lowercase ASCII words separated by spaces.

use std::collections::HashMap;

use ahash::{AHashMap, AHashSet};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::VectorizerConfig;
use crate::error::{CredenceError, Result};
use crate::ml::sparse::SparseVector;

/// Vocabulary and idf weights learned by `fit_transform`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedVocabulary {
    /// Term -> feature index, indices assigned in lexicographic term order.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index.
    idf: Vec<f64>,
    /// Number of documents seen during fitting.
    n_documents: usize,
}

/// TF-IDF vectorizer producing L2-normalized sparse vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    fitted: Option<FittedVocabulary>,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new(VectorizerConfig::default())
    }
}

impl TfIdfVectorizer {
    /// Create a new, unfit vectorizer.
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// Number of features, zero while unfit.
    pub fn vocabulary_size(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.idf.len())
    }

    /// Number of documents the vocabulary was built from.
    pub fn n_documents(&self) -> usize {
        self.fitted.as_ref().map_or(0, |f| f.n_documents)
    }

    /// Feature index of `term`, if it is in the vocabulary.
    pub fn feature_index(&self, term: &str) -> Option<usize> {
        self.fitted.as_ref()?.vocabulary.get(term).copied()
    }

    /// Idf weight of `term`, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let fitted = self.fitted.as_ref()?;
        fitted.vocabulary.get(term).map(|&i| fitted.idf[i])
    }

    /// Vocabulary terms in feature-index order.
    pub fn terms(&self) -> Vec<&str> {
        let Some(fitted) = self.fitted.as_ref() else {
            return Vec::new();
        };
        let mut terms = vec![""; fitted.idf.len()];
        for (term, &i) in &fitted.vocabulary {
            terms[i] = term.as_str();
        }
        terms
    }

    /// Check the fitted state of a vectorizer that did not come from
    /// `fit_transform`: every feature index must be unique and below the
    /// vocabulary size, and every idf weight finite and positive.
    pub fn validate(&self) -> Result<()> {
        let Some(fitted) = self.fitted.as_ref() else {
            return Ok(());
        };
        let n_features = fitted.idf.len();
        if fitted.vocabulary.len() != n_features {
            return Err(CredenceError::invalid_operation(format!(
                "vocabulary has {} terms but {n_features} idf weights",
                fitted.vocabulary.len()
            )));
        }
        let mut seen = vec![false; n_features];
        for (term, &index) in &fitted.vocabulary {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(CredenceError::invalid_operation(format!(
                        "feature index {index} of {term:?} is assigned twice"
                    )));
                }
                None => {
                    return Err(CredenceError::invalid_operation(format!(
                        "feature index {index} of {term:?} is out of range for {n_features} features"
                    )));
                }
            }
        }
        if let Some(weight) = fitted.idf.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(CredenceError::invalid_operation(format!(
                "invalid idf weight {weight}"
            )));
        }
        Ok(())
    }

    /// Learn the vocabulary and idf weights from `documents`, then transform them.
    ///
    /// Fails with `InvalidOperation` if the vectorizer is already fit and with
    /// `Training` if no term survives the document-frequency limits.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Result<Vec<SparseVector>> {
        if self.is_fitted() {
            return Err(CredenceError::invalid_operation(
                "vectorizer is already fit and cannot be re-fit",
            ));
        }

        let n_documents = documents.len();
        let mut document_frequency: AHashMap<&str, usize> = AHashMap::new();
        let mut total_frequency: AHashMap<&str, usize> = AHashMap::new();

        for doc in documents {
            let mut seen: AHashSet<&str> = AHashSet::new();
            for token in self.tokens(doc.as_ref()) {
                *total_frequency.entry(token).or_insert(0) += 1;
                if seen.insert(token) {
                    *document_frequency.entry(token).or_insert(0) += 1;
                }
            }
        }

        let max_doc_count = self.config.max_df * n_documents as f64;
        let mut candidates: Vec<(&str, usize)> = document_frequency
            .iter()
            .filter(|&(_, &df)| df >= self.config.min_df && df as f64 <= max_doc_count)
            .map(|(&term, _)| (term, total_frequency[term]))
            .collect();

        if let Some(max_features) = self.config.max_features {
            if candidates.len() > max_features {
                candidates.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                candidates.truncate(max_features);
            }
        }

        if candidates.is_empty() {
            return Err(CredenceError::training(
                "empty vocabulary: no term survived the document frequency limits",
            ));
        }

        let mut terms: Vec<&str> = candidates.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, term) in terms.into_iter().enumerate() {
            let df = document_frequency[term];
            // Smoothed idf: ln((1 + n) / (1 + df)) + 1
            idf.push(((1.0 + n_documents as f64) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term.to_string(), index);
        }

        info!(
            "Fitted TF-IDF vocabulary: {} terms from {} documents ({} distinct tokens)",
            idf.len(),
            n_documents,
            document_frequency.len()
        );

        self.fitted = Some(FittedVocabulary {
            vocabulary,
            idf,
            n_documents,
        });

        self.transform(documents)
    }

    /// Map documents onto the fitted vocabulary. Unknown terms are ignored.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Result<Vec<SparseVector>> {
        documents
            .iter()
            .map(|doc| self.transform_one(doc.as_ref()))
            .collect()
    }

    /// Map a single document onto the fitted vocabulary.
    pub fn transform_one(&self, document: &str) -> Result<SparseVector> {
        let fitted = self.fitted.as_ref().ok_or_else(|| {
            CredenceError::not_fitted("transform called before fit_transform")
        })?;

        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        let mut unknown = 0usize;
        for token in self.tokens(document) {
            match fitted.vocabulary.get(token) {
                Some(&index) => *counts.entry(index).or_insert(0.0) += 1.0,
                None => unknown += 1,
            }
        }
        if unknown > 0 {
            debug!("Ignored {unknown} out-of-vocabulary tokens");
        }

        let pairs = counts
            .into_iter()
            .map(|(index, count)| (index, count * fitted.idf[index]))
            .collect();

        let mut vector = SparseVector::from_pairs(fitted.idf.len(), pairs);
        vector.normalize();
        Ok(vector)
    }

    fn tokens<'a>(&self, document: &'a str) -> impl Iterator<Item = &'a str> + use<'a> {
        let min_len = self.config.min_token_len;
        document
            .split_whitespace()
            .filter(move |token| token.chars().count() >= min_len)
    }
}
