//! Inference Engine
//!
//! Read-only handle around a loaded pipeline. Cloning shares the same
//! pipeline; nothing is mutated after load.

use crate::artifact::load_pipeline;
use crate::pipeline::FittedPipeline;
use crate::InferenceError;
use classifier::DECISION_THRESHOLD;
use feature_engine::MachineRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Binary failure prediction for one record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Whether a machine failure is predicted
    pub failure: bool,
    /// Positive-class probability (0.0 to 1.0)
    pub probability: f64,
}

impl Prediction {
    /// Apply the fixed decision threshold to a probability
    pub fn from_probability(probability: f64) -> Self {
        Self {
            failure: probability > DECISION_THRESHOLD,
            probability,
        }
    }

    /// Prediction as a 0/1 label
    pub fn label(&self) -> u8 {
        u8::from(self.failure)
    }
}

/// Result of an inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    pub prediction: Prediction,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Shared, read-only inference handle
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    pipeline: Arc<FittedPipeline>,
    model_path: Option<PathBuf>,
}

impl InferenceEngine {
    /// Load a persisted pipeline artifact
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let path = path.as_ref();
        info!("Loading pipeline artifact from {}", path.display());
        let pipeline = load_pipeline(path)?;
        info!(
            "Pipeline loaded: trained {} on {} rows",
            pipeline.metadata().trained_at,
            pipeline.metadata().training_rows
        );
        Ok(Self {
            pipeline: Arc::new(pipeline),
            model_path: Some(path.to_path_buf()),
        })
    }

    /// Wrap an in-memory pipeline
    pub fn from_pipeline(pipeline: FittedPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            model_path: None,
        }
    }

    /// Run one record through the pipeline
    pub fn predict(&self, record: &MachineRecord) -> Result<InferenceResult, InferenceError> {
        let start = Instant::now();
        let prediction = self.pipeline.predict(record)?;
        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            "Prediction {} (p={:.4}) in {}us",
            prediction.label(),
            prediction.probability,
            latency_us
        );
        Ok(InferenceResult {
            prediction,
            latency_us,
        })
    }

    /// Loaded pipeline
    pub fn pipeline(&self) -> &FittedPipeline {
        &self.pipeline
    }

    /// Path the artifact was loaded from, if any
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{fitted, reference_payload};
    use proptest::prelude::*;

    #[test]
    fn test_prediction_threshold() {
        assert!(!Prediction::from_probability(0.5).failure);
        assert!(Prediction::from_probability(0.51).failure);
        assert_eq!(Prediction::from_probability(0.9).label(), 1);
    }

    #[test]
    fn test_engine_predicts_reference_payload() {
        let engine = InferenceEngine::from_pipeline(fitted());
        let result = engine.predict(&reference_payload()).unwrap();
        assert_eq!(result.prediction.label(), 0);
        assert!(engine.model_path().is_none());
    }

    #[test]
    fn test_clones_share_pipeline() {
        let engine = InferenceEngine::from_pipeline(fitted());
        let other = engine.clone();
        assert!(std::ptr::eq(engine.pipeline(), other.pipeline()));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_identical_payloads_identical_predictions(
            torque in 3.0f64..80.0,
            speed in 1100.0f64..2900.0,
            wear in 0.0f64..250.0,
        ) {
            let engine = InferenceEngine::from_pipeline(fitted());
            let mut record = reference_payload();
            record.torque = torque;
            record.rotational_speed = speed;
            record.tool_wear = wear;

            let first = engine.predict(&record).unwrap().prediction;
            let second = engine.predict(&record).unwrap().prediction;
            prop_assert_eq!(first, second);
        }
    }
}
