//! Configuration module for tickwatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`TICKWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use tickwatch::config::TickwatchConfig;
//!
//! let config = TickwatchConfig::default();
//! assert_eq!(config.poller.refresh_interval_seconds, 2);
//!
//! let toml = r#"
//! [server]
//! url = "http://mc.example.net:8080"
//! "#;
//! let config: TickwatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.url, "http://mc.example.net:8080");
//! ```

pub mod error;
pub mod logging;
pub mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use server::ServerConfig;

// Re-export PollerConfig from poller module
pub use crate::poller::PollerConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for tickwatch.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TickwatchConfig {
    /// Dashboard backend connection
    pub server: ServerConfig,
    /// Poll cadence and offline detection
    pub poller: PollerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl TickwatchConfig {
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
    /// Supports TICKWATCH_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("TICKWATCH_URL") {
            self.server.url = url;
        }
        if let Ok(interval) = std::env::var("TICKWATCH_REFRESH_INTERVAL") {
            if let Ok(secs) = interval.parse() {
                self.poller.refresh_interval_seconds = secs;
            }
        }
        if let Ok(auto) = std::env::var("TICKWATCH_AUTO_REFRESH") {
            match auto.to_lowercase().as_str() {
                "true" => self.poller.auto_refresh = true,
                "false" => self.poller.auto_refresh = false,
                _ => {}
            }
        }

        if let Ok(level) = std::env::var("TICKWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TICKWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Validation {
                field: "server.url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation {
                field: "server.url".to_string(),
                message: "URL must start with http:// or https://".to_string(),
            });
        }
        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "server.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        let intervals = [
            (
                "poller.refresh_interval_seconds",
                self.poller.refresh_interval_seconds,
            ),
            (
                "poller.regions_interval_seconds",
                self.poller.regions_interval_seconds,
            ),
            (
                "poller.lag_sources_interval_seconds",
                self.poller.lag_sources_interval_seconds,
            ),
        ];
        for (field, secs) in intervals {
            if secs == 0 {
                return Err(ConfigError::Validation {
                    field: field.to_string(),
                    message: "interval must be at least 1 second".to_string(),
                });
            }
        }

        if self.poller.failure_threshold == 0 {
            return Err(ConfigError::Validation {
                field: "poller.failure_threshold".to_string(),
                message: "threshold must be at least 1".to_string(),
            });
        }
        if self.poller.history_capacity == 0 {
            return Err(ConfigError::Validation {
                field: "poller.history_capacity".to_string(),
                message: "capacity must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    // Env overrides mutate process state; run those tests one at a time.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_config_defaults() {
        let config = TickwatchConfig::default();
        assert_eq!(config.server.url, "http://127.0.0.1:8080");
        assert!(config.poller.auto_refresh);
        assert_eq!(config.poller.failure_threshold, 3);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [poller]
        refresh_interval_seconds = 10
        "#;

        let config: TickwatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poller.refresh_interval_seconds, 10);
        assert_eq!(config.poller.history_capacity, 60); // Default
        assert_eq!(config.server.timeout_seconds, 5); // Default
    }

    #[test]
    fn test_config_parse_example_toml() {
        let toml = include_str!("../../tickwatch.example.toml");
        let config: TickwatchConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config, TickwatchConfig::default());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[server]\nurl = \"http://10.0.0.5:8123\"").unwrap();

        let config = TickwatchConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.server.url, "http://10.0.0.5:8123");
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = TickwatchConfig::load(Some(Path::new("/nonexistent/tickwatch.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_invalid_toml_error() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[poller\nrefresh").unwrap();

        let result = TickwatchConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = TickwatchConfig::load(None).unwrap();
        assert_eq!(config, TickwatchConfig::default());
    }

    #[test]
    fn test_config_env_override_url() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TICKWATCH_URL", "http://192.168.1.20:8080");
        let config = TickwatchConfig::default().with_env_overrides();
        std::env::remove_var("TICKWATCH_URL");

        assert_eq!(config.server.url, "http://192.168.1.20:8080");
    }

    #[test]
    fn test_config_env_override_interval_and_auto_refresh() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TICKWATCH_REFRESH_INTERVAL", "15");
        std::env::set_var("TICKWATCH_AUTO_REFRESH", "FALSE");
        let config = TickwatchConfig::default().with_env_overrides();
        std::env::remove_var("TICKWATCH_REFRESH_INTERVAL");
        std::env::remove_var("TICKWATCH_AUTO_REFRESH");

        assert_eq!(config.poller.refresh_interval_seconds, 15);
        assert!(!config.poller.auto_refresh);
    }

    #[test]
    fn test_config_env_invalid_value_ignored() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TICKWATCH_REFRESH_INTERVAL", "soon");
        std::env::set_var("TICKWATCH_AUTO_REFRESH", "sometimes");
        std::env::set_var("TICKWATCH_LOG_FORMAT", "xml");
        let config = TickwatchConfig::default().with_env_overrides();
        std::env::remove_var("TICKWATCH_REFRESH_INTERVAL");
        std::env::remove_var("TICKWATCH_AUTO_REFRESH");
        std::env::remove_var("TICKWATCH_LOG_FORMAT");

        assert_eq!(config.poller.refresh_interval_seconds, 2);
        assert!(config.poller.auto_refresh);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_env_override_logging() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TICKWATCH_LOG_LEVEL", "debug");
        std::env::set_var("TICKWATCH_LOG_FORMAT", "json");
        let config = TickwatchConfig::default().with_env_overrides();
        std::env::remove_var("TICKWATCH_LOG_LEVEL");
        std::env::remove_var("TICKWATCH_LOG_FORMAT");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = TickwatchConfig::default();
        config.server.url = "  ".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "server.url"
        ));
    }

    #[test]
    fn test_config_validation_url_scheme() {
        let mut config = TickwatchConfig::default();
        config.server.url = "ftp://example.net".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = TickwatchConfig::default();
        config.poller.lag_sources_interval_seconds = 0;

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "poller.lag_sources_interval_seconds"
        ));
    }

    #[test]
    fn test_config_validation_zero_threshold() {
        let mut config = TickwatchConfig::default();
        config.poller.failure_threshold = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "poller.failure_threshold"
        ));
    }
}
