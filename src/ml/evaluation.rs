//! Held-out evaluation of a trained classifier.
//!
//! [`evaluate`] runs a classifier over a test set and produces an
//! [`EvaluationReport`] with accuracy, per-class precision/recall/F1 and the
//! confusion matrix. A class that is never predicted (or never present) gets
//! a precision (or recall) of 0 rather than NaN.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Label;
use crate::error::{CredenceError, Result};
use crate::ml::models::Classifier;
use crate::ml::sparse::SparseVector;

/// 2x2 confusion matrix indexed as `counts[actual][predicted]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; 2]; 2],
}

impl ConfusionMatrix {
    pub fn record(&mut self, actual: Label, predicted: Label) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        self.counts[0][0] + self.counts[1][1]
    }

    /// Number of samples whose true label is `label`.
    pub fn support(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    /// Number of samples predicted as `label`.
    pub fn predicted(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }
}

/// Precision, recall and F1 for one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

impl ClassMetrics {
    fn from_matrix(matrix: &ConfusionMatrix, label: Label) -> Self {
        let tp = matrix.get(label, label) as f64;
        let precision = ratio(tp, matrix.predicted(label) as f64);
        let recall = ratio(tp, matrix.support(label) as f64);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        Self {
            precision,
            recall,
            f1,
            support: matrix.support(label),
        }
    }
}

/// Classification metrics over a held-out set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub n_samples: usize,
    pub accuracy: f64,
    /// Per-class metrics in [`Label::index`] order.
    pub per_class: [ClassMetrics; 2],
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub confusion: ConfusionMatrix,
}

impl EvaluationReport {
    /// Build the report from a confusion matrix.
    pub fn from_confusion(confusion: ConfusionMatrix) -> Self {
        let n_samples = confusion.total();
        let per_class = Label::ALL.map(|label| ClassMetrics::from_matrix(&confusion, label));

        let macro_avg = ClassMetrics {
            precision: per_class.iter().map(|m| m.precision).sum::<f64>() / 2.0,
            recall: per_class.iter().map(|m| m.recall).sum::<f64>() / 2.0,
            f1: per_class.iter().map(|m| m.f1).sum::<f64>() / 2.0,
            support: n_samples,
        };

        let weighted = |metric: fn(&ClassMetrics) -> f64| {
            let total: f64 = per_class
                .iter()
                .map(|m| metric(m) * m.support as f64)
                .sum();
            ratio(total, n_samples as f64)
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: n_samples,
        };

        Self {
            n_samples,
            accuracy: ratio(confusion.correct() as f64, n_samples as f64),
            per_class,
            macro_avg,
            weighted_avg,
            confusion,
        }
    }

    pub fn class(&self, label: Label) -> &ClassMetrics {
        &self.per_class[label.index()]
    }

    /// Flatten the headline numbers into `name -> value` pairs.
    pub fn to_metric_map(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();
        metrics.insert("accuracy".to_string(), self.accuracy);
        metrics.insert("macro_f1".to_string(), self.macro_avg.f1);
        metrics.insert("weighted_f1".to_string(), self.weighted_avg.f1);
        for label in Label::ALL {
            let m = self.class(label);
            let name = label.as_str().to_lowercase();
            metrics.insert(format!("{name}_precision"), m.precision);
            metrics.insert(format!("{name}_recall"), m.recall);
            metrics.insert(format!("{name}_f1"), m.f1);
        }
        metrics.insert("test_samples".to_string(), self.n_samples as f64);
        metrics
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>10} {:>10} {:>10}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for label in Label::ALL {
            write_row(f, label.as_str(), self.class(label))?;
        }
        writeln!(f)?;
        write_row(f, "macro avg", &self.macro_avg)?;
        write_row(f, "weighted avg", &self.weighted_avg)?;
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows: actual, columns: predicted)")?;
        writeln!(f, "{:>14} {:>10} {:>10}", "", "REAL", "FAKE")?;
        for label in Label::ALL {
            writeln!(
                f,
                "{:>14} {:>10} {:>10}",
                label.as_str(),
                self.confusion.get(label, Label::Real),
                self.confusion.get(label, Label::Fake)
            )?;
        }
        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, name: &str, m: &ClassMetrics) -> fmt::Result {
    writeln!(
        f,
        "{:>14} {:>10.4} {:>10.4} {:>10.4} {:>10}",
        name, m.precision, m.recall, m.f1, m.support
    )
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Score `classifier` on a held-out set. The classifier is only read.
pub fn evaluate<C: Classifier + ?Sized>(
    classifier: &C,
    features: &[SparseVector],
    labels: &[Label],
) -> Result<EvaluationReport> {
    if features.len() != labels.len() {
        return Err(CredenceError::invalid_operation(format!(
            "{} feature vectors but {} labels",
            features.len(),
            labels.len()
        )));
    }
    if features.is_empty() {
        return Err(CredenceError::invalid_operation(
            "cannot evaluate on an empty test set",
        ));
    }

    let mut confusion = ConfusionMatrix::default();
    for (x, &actual) in features.iter().zip(labels) {
        confusion.record(actual, classifier.predict(x)?);
    }
    Ok(EvaluationReport::from_confusion(confusion))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Predicts fake whenever feature 0 is set.
    struct FirstFeature;

    impl Classifier for FirstFeature {
        fn predict(&self, features: &SparseVector) -> Result<Label> {
            Ok(if features.get(0) > 0.0 { Label::Fake } else { Label::Real })
        }

        fn predict_proba(&self, features: &SparseVector) -> Result<[f64; 2]> {
            Ok(match self.predict(features)? {
                Label::Fake => [0.0, 1.0],
                Label::Real => [1.0, 0.0],
            })
        }

        fn name(&self) -> &str {
            "first_feature"
        }
    }

    fn matrix(tn: usize, fp: usize, fn_: usize, tp: usize) -> ConfusionMatrix {
        ConfusionMatrix {
            counts: [[tn, fp], [fn_, tp]],
        }
    }

    #[test]
    fn test_metrics_from_confusion() {
        // 6 real (5 right), 4 fake (3 right)
        let report = EvaluationReport::from_confusion(matrix(5, 1, 1, 3));
        assert_eq!(report.n_samples, 10);
        assert!((report.accuracy - 0.8).abs() < 1e-12);

        let fake = report.class(Label::Fake);
        assert!((fake.precision - 0.75).abs() < 1e-12);
        assert!((fake.recall - 0.75).abs() < 1e-12);
        assert_eq!(fake.support, 4);

        let real = report.class(Label::Real);
        assert!((real.precision - 5.0 / 6.0).abs() < 1e-12);
        assert!((real.recall - 5.0 / 6.0).abs() < 1e-12);

        let expected_weighted = (real.f1 * 6.0 + fake.f1 * 4.0) / 10.0;
        assert!((report.weighted_avg.f1 - expected_weighted).abs() < 1e-12);
        assert!((report.macro_avg.f1 - (real.f1 + fake.f1) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_division_is_zero() {
        // Everything predicted real.
        let report = EvaluationReport::from_confusion(matrix(3, 0, 2, 0));
        let fake = report.class(Label::Fake);
        assert_eq!(fake.precision, 0.0);
        assert_eq!(fake.recall, 0.0);
        assert_eq!(fake.f1, 0.0);
        assert!(report.accuracy.is_finite());
    }

    #[test]
    fn test_evaluate_classifier() {
        let features = vec![
            SparseVector::from_pairs(2, vec![(0, 1.0)]),
            SparseVector::from_pairs(2, vec![(1, 1.0)]),
            SparseVector::from_pairs(2, vec![(0, 1.0)]),
        ];
        let labels = vec![Label::Fake, Label::Real, Label::Real];
        let report = evaluate(&FirstFeature, &features, &labels).unwrap();

        assert_eq!(report.confusion.get(Label::Fake, Label::Fake), 1);
        assert_eq!(report.confusion.get(Label::Real, Label::Fake), 1);
        assert_eq!(report.confusion.get(Label::Real, Label::Real), 1);
        assert!((report.accuracy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_rejects_bad_input() {
        assert!(evaluate(&FirstFeature, &[], &[]).is_err());
        let features = vec![SparseVector::zeros(2)];
        assert!(evaluate(&FirstFeature, &features, &[]).is_err());
    }

    #[test]
    fn test_report_rendering() {
        let report = EvaluationReport::from_confusion(matrix(5, 1, 1, 3));
        let text = report.to_string();
        assert!(text.starts_with("Accuracy: 0.8000"));
        assert!(text.contains("precision"));
        assert!(text.contains("weighted avg"));
        assert!(text.contains("FAKE"));

        let metrics = report.to_metric_map();
        assert_eq!(metrics["accuracy"], report.accuracy);
        assert_eq!(metrics["fake_recall"], 0.75);
        assert_eq!(metrics["test_samples"], 10.0);
    }
}
