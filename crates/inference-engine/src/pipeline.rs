//! Fitted Pipeline
//!
//! The feature builder vocabulary, preprocessing parameters and classifier
//! weights, fitted together and treated as one immutable artifact.

use crate::engine::Prediction;
use crate::artifact::FORMAT_VERSION;
use crate::InferenceError;
use chrono::{DateTime, Utc};
use classifier::{ClassificationReport, ClassifierError, LogisticConfig, LogisticModel, LogisticRegression};
use feature_engine::{FeatureBuilder, MachineRecord};
use ndarray::{Array1, Array2, ArrayView1};
use preprocessing::{FittedPreprocessor, Preprocessor};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings for fitting a pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub preprocessor: Preprocessor,
    pub classifier: LogisticConfig,
}

/// Descriptive information stored alongside the fitted parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub format_version: u16,
    pub trained_at: DateTime<Utc>,
    pub training_rows: usize,
    /// Classifier input columns in matrix order
    pub feature_names: Vec<String>,
    pub iterations: usize,
    pub converged: bool,
    /// Holdout scores, when the trainer evaluated before persisting
    pub evaluation: Option<ClassificationReport>,
}

/// A fully fitted feature + preprocessing + classifier pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    features: FeatureBuilder,
    preprocessor: FittedPreprocessor,
    model: LogisticModel,
    metadata: PipelineMetadata,
}

impl FittedPipeline {
    /// Fit every stage on labelled training records
    pub fn fit(
        records: &[MachineRecord],
        labels: ArrayView1<'_, u8>,
        config: PipelineConfig,
    ) -> Result<Self, InferenceError> {
        if labels.len() != records.len() {
            return Err(ClassifierError::ShapeMismatch {
                expected: format!("{} labels", records.len()),
                actual: format!("{} labels", labels.len()),
            }
            .into());
        }

        let features = FeatureBuilder::fit(records);
        let rows = features.build_batch(records)?;
        let (preprocessor, matrix) = config.preprocessor.fit_transform(&rows)?;
        let model = LogisticRegression::new(config.classifier).fit(matrix.view(), labels)?;

        let metadata = PipelineMetadata {
            format_version: FORMAT_VERSION,
            trained_at: Utc::now(),
            training_rows: records.len(),
            feature_names: preprocessor.feature_names(),
            iterations: model.iterations(),
            converged: model.converged(),
            evaluation: None,
        };

        info!(
            "Fitted pipeline on {} records ({} features, {} iterations)",
            records.len(),
            metadata.feature_names.len(),
            metadata.iterations
        );

        Ok(Self {
            features,
            preprocessor,
            model,
            metadata,
        })
    }

    /// Classifier input matrix for a batch of records
    pub fn transform(&self, records: &[MachineRecord]) -> Result<Array2<f64>, InferenceError> {
        let rows = self.features.build_batch(records)?;
        Ok(self.preprocessor.transform(&rows)?)
    }

    /// Predict a single record
    pub fn predict(&self, record: &MachineRecord) -> Result<Prediction, InferenceError> {
        let row = self.features.build(record)?;
        let matrix = self.preprocessor.transform(std::slice::from_ref(&row))?;
        let proba = self.model.predict_proba(matrix.view())?;
        Ok(Prediction::from_probability(proba[0]))
    }

    /// Predict a batch of records
    pub fn predict_batch(&self, records: &[MachineRecord]) -> Result<Vec<Prediction>, InferenceError> {
        let matrix = self.transform(records)?;
        let proba = self.model.predict_proba(matrix.view())?;
        Ok(proba.iter().map(|&p| Prediction::from_probability(p)).collect())
    }

    /// Binary labels for a batch of records
    pub fn predict_labels(&self, records: &[MachineRecord]) -> Result<Array1<u8>, InferenceError> {
        let matrix = self.transform(records)?;
        Ok(self.model.predict(matrix.view())?)
    }

    /// Score the pipeline against labelled records
    pub fn evaluate(
        &self,
        records: &[MachineRecord],
        labels: ArrayView1<'_, u8>,
    ) -> Result<ClassificationReport, InferenceError> {
        let predicted = self.predict_labels(records)?;
        Ok(ClassificationReport::compute(labels, predicted.view())?)
    }

    /// Attach holdout scores before persisting
    pub fn with_evaluation(mut self, report: ClassificationReport) -> Self {
        self.metadata.evaluation = Some(report);
        self
    }

    pub fn metadata(&self) -> &PipelineMetadata {
        &self.metadata
    }

    pub fn feature_builder(&self) -> &FeatureBuilder {
        &self.features
    }

    pub fn preprocessor(&self) -> &FittedPreprocessor {
        &self.preprocessor
    }

    pub fn model(&self) -> &LogisticModel {
        &self.model
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use feature_engine::FeatureError;

    pub(crate) fn synthetic_record(i: usize) -> MachineRecord {
        let machine_type = ["L", "M", "H"][i % 3];
        let torque = 20.0 + (i % 50) as f64;
        let failed = torque >= 62.0;
        MachineRecord {
            udi: Some(i as u64 + 1),
            product_id: Some(format!("{}{}", machine_type, 14_800 + i)),
            machine_type: machine_type.to_string(),
            air_temperature: 298.0 + (i % 7) as f64 * 0.3,
            process_temperature: 308.0 + (i % 5) as f64 * 0.4,
            rotational_speed: 1400.0 + (i % 11) as f64 * 25.0,
            torque,
            tool_wear: (i % 200) as f64,
            machine_failure: Some(u8::from(failed)),
            twf: 0,
            hdf: 0,
            pwf: 0,
            osf: u8::from(failed),
            rnf: 0,
        }
    }

    pub(crate) fn synthetic_dataset(n: usize) -> (Vec<MachineRecord>, Array1<u8>) {
        let records: Vec<MachineRecord> = (0..n).map(synthetic_record).collect();
        let labels = records.iter().map(|r| r.machine_failure.unwrap_or(0)).collect();
        (records, labels)
    }

    pub(crate) fn reference_payload() -> MachineRecord {
        MachineRecord {
            udi: Some(90),
            product_id: Some("M14949".to_string()),
            machine_type: "M".to_string(),
            air_temperature: 298.9,
            process_temperature: 308.9,
            rotational_speed: 1487.0,
            torque: 39.5,
            tool_wear: 30.0,
            machine_failure: None,
            twf: 0,
            hdf: 0,
            pwf: 0,
            osf: 0,
            rnf: 0,
        }
    }

    pub(crate) fn fitted() -> FittedPipeline {
        let (records, labels) = synthetic_dataset(300);
        FittedPipeline::fit(&records, labels.view(), PipelineConfig::default()).unwrap()
    }

    #[test]
    fn test_fit_records_metadata() {
        let pipeline = fitted();
        let meta = pipeline.metadata();
        assert_eq!(meta.training_rows, 300);
        assert_eq!(meta.format_version, FORMAT_VERSION);
        assert_eq!(meta.feature_names.len(), 11 + 3 + 3);
        assert!(meta.evaluation.is_none());
        assert_eq!(pipeline.feature_builder().type_categories(), &["H", "L", "M"]);
    }

    #[test]
    fn test_reference_payload_predicts_no_failure() {
        let prediction = fitted().predict(&reference_payload()).unwrap();
        assert!(!prediction.failure);
        assert_eq!(prediction.label(), 0);
        assert!(prediction.probability < 0.5);
    }

    #[test]
    fn test_failure_pattern_predicts_failure() {
        let mut record = reference_payload();
        record.torque = 68.0;
        record.osf = 1;
        let prediction = fitted().predict(&record).unwrap();
        assert_eq!(prediction.label(), 1);
    }

    #[test]
    fn test_training_accuracy_on_separable_data() {
        let (records, labels) = synthetic_dataset(300);
        let pipeline = fitted();
        let report = pipeline.evaluate(&records, labels.view()).unwrap();
        assert!(report.accuracy > 0.95, "accuracy {}", report.accuracy);
    }

    #[test]
    fn test_batch_matches_single() {
        let pipeline = fitted();
        let (records, _) = synthetic_dataset(20);
        let batch = pipeline.predict_batch(&records).unwrap();
        for (record, expected) in records.iter().zip(batch) {
            assert_eq!(pipeline.predict(record).unwrap(), expected);
        }
    }

    #[test]
    fn test_unseen_type_does_not_fail() {
        let mut record = reference_payload();
        record.machine_type = "X".to_string();
        assert!(fitted().predict(&record).is_ok());
    }

    #[test]
    fn test_missing_product_id_fails() {
        let mut record = reference_payload();
        record.product_id = None;
        let err = fitted().predict(&record).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::Feature(FeatureError::MissingField("Product ID"))
        ));
    }

    #[test]
    fn test_label_count_mismatch() {
        let (records, _) = synthetic_dataset(10);
        let labels = Array1::<u8>::zeros(9);
        let err = FittedPipeline::fit(&records, labels.view(), PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, InferenceError::Classifier(ClassifierError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_with_evaluation_attaches_report() {
        let (records, labels) = synthetic_dataset(60);
        let pipeline = fitted();
        let report = pipeline.evaluate(&records, labels.view()).unwrap();
        let pipeline = pipeline.with_evaluation(report.clone());
        assert_eq!(pipeline.metadata().evaluation.as_ref(), Some(&report));
    }
}
