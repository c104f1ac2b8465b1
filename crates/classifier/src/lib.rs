//! Binary Classifier
//!
//! L2-regularized logistic regression fitted by full-batch gradient descent,
//! plus the evaluation metrics used on the holdout set.

mod logistic;
pub mod metrics;

pub use logistic::{LogisticConfig, LogisticModel, LogisticRegression, DECISION_THRESHOLD};
pub use metrics::{accuracy_score, AverageMetrics, ClassMetrics, ClassificationReport};

use thiserror::Error;

/// Errors during classifier training or scoring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("Training set is empty")]
    EmptyInput,
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
    #[error("Label {0} is not binary (expected 0 or 1)")]
    InvalidLabel(u8),
    #[error("Training labels contain a single class ({0}); need both 0 and 1")]
    SingleClass(u8),
    #[error("Non-finite values in {0}")]
    NonFinite(&'static str),
}
