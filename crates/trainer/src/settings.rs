//! Training Configuration
//!
//! Defaults, then an optional TOML file, then `TRAINER_*` environment
//! variables. Command-line flags are applied on top by the binary.

use crate::TrainingError;
use classifier::LogisticConfig;
use config::{Config, Environment, File};
use inference_engine::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Training run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Input CSV
    pub data_path: PathBuf,
    /// Output artifact
    pub model_path: PathBuf,
    /// Holdout fraction
    pub test_size: f64,
    /// Shuffle seed for the holdout split
    pub seed: u64,
    pub max_iter: usize,
    pub learning_rate: f64,
    pub tolerance: f64,
    /// Inverse L2 regularization strength
    pub regularization: f64,
    /// Render summary charts here when set
    pub report_dir: Option<PathBuf>,
    pub log_level: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let classifier = LogisticConfig::default();
        Self {
            data_path: PathBuf::from("data/raw_data.csv"),
            model_path: PathBuf::from("model/logistic_regression_model.bin"),
            test_size: 0.2,
            seed: 42,
            max_iter: classifier.max_iter,
            learning_rate: classifier.learning_rate,
            tolerance: classifier.tolerance,
            regularization: classifier.regularization,
            report_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl TrainingConfig {
    /// Load layered configuration
    pub fn load(path: Option<&Path>) -> Result<Self, TrainingError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config: Self = builder
            .add_source(Environment::with_prefix("TRAINER").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the driver cannot run with
    pub fn validate(&self) -> Result<(), TrainingError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TrainingError::InvalidConfig(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.max_iter == 0 {
            return Err(TrainingError::InvalidConfig("max_iter must be positive".into()));
        }
        if !(self.learning_rate > 0.0) || !(self.regularization > 0.0) {
            return Err(TrainingError::InvalidConfig(
                "learning_rate and regularization must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Pipeline settings derived from this config
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            classifier: LogisticConfig {
                max_iter: self.max_iter,
                learning_rate: self.learning_rate,
                tolerance: self.tolerance,
                regularization: self.regularization,
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = TrainingConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/raw_data.csv"));
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_iter, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("trainer-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("train.toml");
        std::fs::write(&path, "seed = 7\nmax_iter = 50\nreport_dir = \"reports\"\n").unwrap();

        let config = TrainingConfig::load(Some(&path)).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_iter, 50);
        assert_eq!(config.report_dir, Some(PathBuf::from("reports")));
        assert_eq!(config.test_size, 0.2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_config_file_fails() {
        let err = TrainingConfig::load(Some(Path::new("/nonexistent/train.toml"))).unwrap_err();
        assert!(matches!(err, TrainingError::Config(_)));
    }

    #[test]
    fn test_invalid_test_size_rejected() {
        let config = TrainingConfig {
            test_size: 1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TrainingError::InvalidConfig(_))));
    }

    #[test]
    fn test_pipeline_config_carries_optimizer_settings() {
        let config = TrainingConfig {
            max_iter: 12,
            regularization: 0.5,
            ..Default::default()
        };
        let pipeline = config.pipeline_config();
        assert_eq!(pipeline.classifier.max_iter, 12);
        assert_eq!(pipeline.classifier.regularization, 0.5);
        assert!(pipeline.preprocessor.passthrough_indicators);
    }
}
