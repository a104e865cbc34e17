//! Configuration module for Trazo
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TRAZO_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use trazo::config::TrazoConfig;
//!
//! let config = TrazoConfig::default();
//! assert_eq!(config.warehouse.route_key_column, "ID_TRAZO");
//!
//! let toml = r#"
//! [optimizer]
//! timeout_secs = 5
//! "#;
//! let config: TrazoConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.optimizer.timeout_secs, 5);
//! ```

pub mod error;
pub mod logging;
pub mod optimizer;
pub mod warehouse;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use optimizer::OptimizerConfig;
pub use warehouse::WarehouseConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the `trazo` tool.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrazoConfig {
    /// Candidate route warehouse
    pub warehouse: WarehouseConfig,
    /// Route optimizer service
    pub optimizer: OptimizerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TrazoConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports TRAZO_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("TRAZO_WAREHOUSE_URL") {
            self.warehouse.base_url = url;
        }
        if let Ok(project) = std::env::var("TRAZO_WAREHOUSE_PROJECT") {
            self.warehouse.project_id = project;
        }
        if let Ok(timeout) = std::env::var("TRAZO_WAREHOUSE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.warehouse.timeout_secs = t;
            }
        }

        if let Ok(url) = std::env::var("TRAZO_OPTIMIZER_URL") {
            self.optimizer.url = url;
        }
        if let Ok(timeout) = std::env::var("TRAZO_OPTIMIZER_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.optimizer.timeout_secs = t;
            }
        }

        if let Ok(level) = std::env::var("TRAZO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TRAZO_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("warehouse.base_url", &self.warehouse.base_url),
            ("warehouse.project_id", &self.warehouse.project_id),
            ("warehouse.dataset_id", &self.warehouse.dataset_id),
            ("warehouse.table_id", &self.warehouse.table_id),
            ("warehouse.route_key_column", &self.warehouse.route_key_column),
            ("optimizer.url", &self.optimizer.url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }

        // Table parts are spliced into SQL between backticks
        let table_parts = [
            ("warehouse.project_id", &self.warehouse.project_id),
            ("warehouse.dataset_id", &self.warehouse.dataset_id),
            ("warehouse.table_id", &self.warehouse.table_id),
        ];
        for (field, value) in table_parts {
            if !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "may only contain letters, digits, '_' and '-'".to_string(),
                });
            }
        }

        if self.warehouse.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "warehouse.timeout_secs".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }
        if self.optimizer.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "optimizer.timeout_secs".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::WeightPreset;
    use std::path::Path;

    #[test]
    fn test_trazo_config_defaults() {
        let config = TrazoConfig::default();
        assert_eq!(config.warehouse.timeout_secs, 30);
        assert_eq!(config.optimizer.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_full_toml() {
        let toml = include_str!("../../trazo.example.toml");
        let config: TrazoConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.optimizer.default_preset, WeightPreset::Baja);
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[warehouse]\ntable_id = \"rutas\"\n[optimizer]\nurl = \"http://localhost:9000/plan\"",
        )
        .unwrap();

        let config = TrazoConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.warehouse.table_id, "rutas");
        assert_eq!(config.optimizer.url, "http://localhost:9000/plan");
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = TrazoConfig::load(Some(Path::new("/nonexistent/trazo.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[warehouse\n").unwrap();
        assert!(matches!(
            TrazoConfig::load(Some(temp.path())),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = TrazoConfig::load(None).unwrap();
        assert_eq!(config.warehouse.route_key_column, "ID_TRAZO");
    }

    #[test]
    fn test_config_env_override_optimizer_url() {
        std::env::set_var("TRAZO_OPTIMIZER_URL", "http://127.0.0.1:7000/plan");
        let config = TrazoConfig::default().with_env_overrides();
        std::env::remove_var("TRAZO_OPTIMIZER_URL");

        assert_eq!(config.optimizer.url, "http://127.0.0.1:7000/plan");
    }

    #[test]
    fn test_config_env_invalid_timeout_ignored() {
        std::env::set_var("TRAZO_WAREHOUSE_TIMEOUT", "soon");
        let config = TrazoConfig::default().with_env_overrides();
        std::env::remove_var("TRAZO_WAREHOUSE_TIMEOUT");

        assert_eq!(config.warehouse.timeout_secs, 30);
    }

    #[test]
    fn test_config_env_override_log_format() {
        std::env::set_var("TRAZO_LOG_FORMAT", "json");
        let config = TrazoConfig::default().with_env_overrides();
        std::env::remove_var("TRAZO_LOG_FORMAT");

        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_validation_empty_optimizer_url() {
        let mut config = TrazoConfig::default();
        config.optimizer.url = " ".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "optimizer.url"
        ));
    }

    #[test]
    fn test_config_validation_table_name_characters() {
        let mut config = TrazoConfig::default();
        config.warehouse.table_id = "rutas`; DROP TABLE x".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "warehouse.table_id"
        ));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = TrazoConfig::default();
        config.warehouse.timeout_secs = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "warehouse.timeout_secs"
        ));
    }
}
