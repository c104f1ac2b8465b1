//! Service Configuration

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prediction service settings.
///
/// Defaults, then an optional TOML file, then `FAILURE_API_*` environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_addr: String,
    /// Pipeline artifact loaded at startup
    pub model_path: PathBuf,
    /// Install the Prometheus recorder and serve `/metrics`
    pub enable_metrics: bool,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            model_path: PathBuf::from("model/logistic_regression_model.bin"),
            enable_metrics: true,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load layered configuration
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(Environment::with_prefix("FAILURE_API").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.bind_addr, "0.0.0.0:5000");
        assert!(config.enable_metrics);
    }

    #[test]
    fn test_file_overrides() {
        let dir = std::env::temp_dir().join(format!("api-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("api.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:8080\"\nenable_metrics = false\n").unwrap();

        let config = ServiceConfig::load(Some(&path)).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert!(!config.enable_metrics);
        assert_eq!(config.model_path, PathBuf::from("model/logistic_regression_model.bin"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
