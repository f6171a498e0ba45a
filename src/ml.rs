//! Features and models: sparse vectors, the TF-IDF vectorizer, the logistic
//! regression classifier and its evaluation.

pub mod evaluation;
pub mod logistic;
pub mod models;
pub mod sparse;
pub mod tfidf;

pub use evaluation::{ClassMetrics, ConfusionMatrix, EvaluationReport, evaluate};
pub use logistic::LogisticRegression;
pub use models::{Classifier, ModelMetadata, TrainingStats};
pub use sparse::SparseVector;
pub use tfidf::TfIdfVectorizer;
