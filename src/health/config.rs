//! Configuration for health probing.

use serde::{Deserialize, Serialize};

/// Configuration for server health probing and monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Whether the periodic health monitor runs
    pub enabled: bool,
    /// Seconds between monitor probes
    pub interval_seconds: u64,
    /// Timeout for each probe request
    pub timeout_seconds: u64,
    /// Path probed on the server base URL
    pub endpoint: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 5,
            timeout_seconds: 3,
            endpoint: "/patterns/names".to_string(),
        }
    }
}
