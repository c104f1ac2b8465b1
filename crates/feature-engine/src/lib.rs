//! Feature Engineering Engine
//!
//! Turns raw machine telemetry records into fixed-schema feature rows:
//! one-hot machine type indicators, a decomposed product code, and the
//! numeric sensor readings.

mod error;
mod features;
mod product;
mod record;

pub use error::FeatureError;
pub use features::{FeatureBuilder, FeatureRow, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS, NUMERIC_DIMENSION};
pub use product::ProductCode;
pub use record::{FailureModes, MachineRecord};
