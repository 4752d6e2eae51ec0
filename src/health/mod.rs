//! Health probing for the local pattern server.
//!
//! A probe is a single GET against a well-known endpoint. "Unreachable" is an
//! ordinary answer here, so probes return `bool` and only log the reason.

mod config;
mod error;

#[cfg(test)]
mod tests;

pub use config::*;
pub use error::*;

use crate::events::{AppEvent, EventSender};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Single-shot reachability check.
///
/// Implemented over HTTP by [`HttpHealthProber`]; the supervisor depends on the
/// trait so tests can script probe outcomes.
#[async_trait]
pub trait HealthProbe: Send + Sync + 'static {
    /// Returns true only when the server answered with a success status within `timeout`.
    async fn probe(&self, base_url: &str, timeout: Duration) -> bool;
}

/// HTTP prober hitting `{base_url}{endpoint}`.
#[derive(Debug, Clone)]
pub struct HttpHealthProber {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpHealthProber {
    /// Create a prober with its own HTTP client.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Create a prober sharing an existing client's connection pool.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &HealthCheckConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    /// Probe and classify the failure, if any.
    pub async fn check(&self, base_url: &str, timeout: Duration) -> Result<(), HealthCheckError> {
        let url = format!("{}{}", base_url.trim_end_matches('/'), self.endpoint);
        let response = self
            .client
            .get(&url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| HealthCheckError::from_reqwest(&e, timeout.as_millis()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(HealthCheckError::HttpError(status.as_u16()))
        }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProber {
    async fn probe(&self, base_url: &str, timeout: Duration) -> bool {
        match self.check(base_url, timeout).await {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!(base_url, error = %error, "Health probe failed");
                false
            }
        }
    }
}

/// Background task that probes periodically and reports reachability changes.
pub struct HealthMonitor {
    prober: Arc<dyn HealthProbe>,
    base_url: String,
    config: HealthCheckConfig,
    events: EventSender,
}

impl HealthMonitor {
    pub fn new(
        prober: Arc<dyn HealthProbe>,
        base_url: impl Into<String>,
        config: HealthCheckConfig,
        events: EventSender,
    ) -> Self {
        Self {
            prober,
            base_url: base_url.into(),
            config,
            events,
        }
    }

    /// Start the monitor. Emits `server:health` on the first probe and on every change.
    /// Returns a JoinHandle that resolves when the token is cancelled.
    pub fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let period = Duration::from_secs(self.config.interval_seconds.max(1));
            let timeout = Duration::from_secs(self.config.timeout_seconds);
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut last: Option<bool> = None;

            tracing::info!(
                interval_seconds = period.as_secs(),
                base_url = %self.base_url,
                "Health monitor started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Health monitor shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let online = self.prober.probe(&self.base_url, timeout).await;
                        if last != Some(online) {
                            tracing::info!(online, "Server reachability changed");
                            self.events.emit(AppEvent::ServerHealth { online });
                            last = Some(online);
                        }
                    }
                }
            }
        })
    }
}
