//! Managed server configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default base URL of the pattern server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// How to launch and reach the pattern server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL the client talks to
    pub base_url: String,
    /// Executable name (looked up on PATH) or path
    pub executable: String,
    /// Arguments passed before the derived address flag
    pub args: Vec<String>,
    /// Append `--address :PORT` derived from `base_url`
    pub pass_address: bool,
    /// Wait after spawning before the first health probe
    pub startup_grace_ms: u64,
    /// Extra wait before the second probe when the first failed
    pub retry_grace_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            executable: "fabric".to_string(),
            args: vec!["--serve".to_string()],
            pass_address: true,
            startup_grace_ms: 2000,
            retry_grace_ms: 3000,
        }
    }
}

impl ServerConfig {
    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }

    pub fn retry_grace(&self) -> Duration {
        Duration::from_millis(self.retry_grace_ms)
    }
}

/// Trim whitespace and a trailing `/` from a base URL.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
