//! Configuration module for fabric-desk
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`FABRIC_DESK_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! User preferences (`preferences.json`) are separate: they belong to the UI and are
//! loaded through [`PreferencesStore`].
//!
//! # Example
//!
//! ```rust
//! use fabric_desk::config::AppConfig;
//!
//! let toml = r#"
//! [server]
//! base_url = "http://localhost:8083"
//! "#;
//! let config: AppConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.server.base_url, "http://localhost:8083");
//! assert_eq!(config.server.executable, "fabric");
//! ```

pub mod error;
pub mod logging;
pub mod preferences;
pub mod server;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use preferences::{Preferences, PreferencesStore};
pub use server::{normalize_base_url, ServerConfig, DEFAULT_BASE_URL};

// Re-export HealthCheckConfig from health module
pub use crate::health::HealthCheckConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the client core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Managed server settings
    pub server: ServerConfig,
    /// Health probe and monitor settings
    pub health_check: HealthCheckConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
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
                let mut config: Self =
                    toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
                config.server.base_url = normalize_base_url(&config.server.base_url);
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("FABRIC_DESK_BASE_URL") {
            self.server.base_url = normalize_base_url(&url);
        }
        if let Ok(executable) = std::env::var("FABRIC_DESK_EXECUTABLE") {
            self.server.executable = executable;
        }

        if let Ok(level) = std::env::var("FABRIC_DESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FABRIC_DESK_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(health) = std::env::var("FABRIC_DESK_HEALTH_CHECK") {
            self.health_check.enabled = health.to_lowercase() == "true";
        }

        self
    }

    /// Prefer a base URL the user saved in preferences. `None` or empty keeps the
    /// configured one.
    pub fn with_saved_base_url(mut self, saved: Option<&str>) -> Self {
        if let Some(url) = saved.map(normalize_base_url).filter(|url| !url.is_empty()) {
            self.server.base_url = url;
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = &self.server.base_url;
        if base_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "server.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        }
        match reqwest::Url::parse(base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigError::Validation {
                    field: "server.base_url".to_string(),
                    message: format!("'{}' is not an http(s) URL", base_url),
                });
            }
        }

        if self.server.executable.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "server.executable".to_string(),
                message: "executable cannot be empty".to_string(),
            });
        }

        self.logging.validate()?;

        if self.health_check.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "health_check.timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        Ok(())
    }
}
