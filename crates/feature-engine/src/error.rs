//! Feature Error Types

use thiserror::Error;

/// Errors while building feature rows from raw records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// A field needed for feature construction is absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Product code does not match `[A-Z][0-9]+`
    #[error("Invalid product code {code:?}: {reason}")]
    InvalidProductCode { code: String, reason: String },

    /// Sensor reading is NaN or infinite
    #[error("{field} value {value} is not finite")]
    NonFiniteValue { field: &'static str, value: f64 },

    /// A row inside a batch failed
    #[error("Row {index}: {source}")]
    Row {
        index: usize,
        #[source]
        source: Box<FeatureError>,
    },
}
