//! `[logging]` section

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Subscriber output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [LogFormat::Pretty, LogFormat::Json]
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::Validation {
                field: "logging.format".to_string(),
                message: format!("'{}' is not one of pretty, json", s),
            })
    }
}

/// Base level, output style and per-module overrides.
///
/// `component_levels` keys are module names under `fabric_desk`, e.g.
/// `supervisor = "debug"` becomes the directive `fabric_desk::supervisor=debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<BTreeMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}

impl LoggingConfig {
    /// Reject level names the filter would not understand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_level("logging.level", &self.level)?;
        for (component, level) in self.component_levels.iter().flatten() {
            check_level(&format!("logging.component_levels.{}", component), level)?;
        }
        Ok(())
    }
}

fn check_level(field: &str, level: &str) -> Result<(), ConfigError> {
    if LEVELS.iter().any(|l| l.eq_ignore_ascii_case(level.trim())) {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: field.to_string(),
            message: format!("unknown level '{}'", level),
        })
    }
}
