//! Failure Prediction Inference
//!
//! Combines the feature builder, the fitted preprocessor and the logistic
//! model into one immutable pipeline, persists it as a versioned artifact,
//! and serves single-record predictions from a shared read-only handle.

mod artifact;
mod engine;
mod pipeline;

pub use artifact::{decode_pipeline, encode_pipeline, load_pipeline, save_pipeline, ARTIFACT_MAGIC, FORMAT_VERSION};
pub use engine::{InferenceEngine, InferenceResult, Prediction};
pub use pipeline::{FittedPipeline, PipelineConfig, PipelineMetadata};

use thiserror::Error;

/// Errors during pipeline fitting, persistence or inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Unsupported artifact format version {found} (expected {expected})")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("Feature construction failed: {0}")]
    Feature(#[from] feature_engine::FeatureError),
    #[error("Preprocessing failed: {0}")]
    Preprocess(#[from] preprocessing::PreprocessError),
    #[error("Classifier failed: {0}")]
    Classifier(#[from] classifier::ClassifierError),
    #[error("Artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Artifact serialization failed: {0}")]
    Serialization(#[from] postcard::Error),
}
