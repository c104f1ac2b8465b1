//! Preprocessing Error Types

use thiserror::Error;

/// Errors during preprocessing fit or transform
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessError {
    /// Fit was called with no rows
    #[error("Cannot fit on an empty batch")]
    EmptyInput,

    /// Row width differs from what was seen at fit time
    #[error("{what} width mismatch: expected {expected}, got {actual}")]
    WidthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Indicator columns name different categories than at fit time
    #[error("Type categories {actual:?} do not match fitted {expected:?}")]
    CategoryMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// Input contains NaN or infinity
    #[error("Non-finite value {value} in column {column}")]
    NonFinite { column: String, value: f64 },
}
