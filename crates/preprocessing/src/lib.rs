//! Preprocessing Pipeline
//!
//! Standardizes numeric feature columns, one-hot encodes categorical ones,
//! and combines both into a single fitted transform producing the numeric
//! matrix the classifier consumes.

mod encoder;
mod error;
mod scaler;
mod transformer;

pub use encoder::OneHotEncoder;
pub use error::PreprocessError;
pub use scaler::StandardScaler;
pub use transformer::{FittedPreprocessor, Preprocessor};
