//! Error types for health probing.

use thiserror::Error;

/// Why a probe came back negative. Logged, never returned to callers.
#[derive(Debug, Clone, Error)]
pub enum HealthCheckError {
    /// Request timeout
    #[error("request timeout after {0}ms")]
    Timeout(u128),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(u16),
}

impl HealthCheckError {
    /// Classify a reqwest error.
    pub fn from_reqwest(e: &reqwest::Error, timeout_ms: u128) -> Self {
        if e.is_timeout() {
            HealthCheckError::Timeout(timeout_ms)
        } else {
            HealthCheckError::ConnectionFailed(e.to_string())
        }
    }
}
