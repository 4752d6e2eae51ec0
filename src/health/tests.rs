//! Unit tests for health module.

use super::*;
use crate::events;
use mockito::Server;
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// HealthCheckConfig
// ============================================================================

#[test]
fn test_config_default_values() {
    let config = HealthCheckConfig::default();
    assert!(config.enabled);
    assert_eq!(config.interval_seconds, 5);
    assert_eq!(config.timeout_seconds, 3);
    assert_eq!(config.endpoint, "/patterns/names");
}

#[test]
fn test_config_partial_toml() {
    let toml = r#"
        enabled = false
        timeout_seconds = 1
    "#;
    let config: HealthCheckConfig = toml::from_str(toml).unwrap();
    assert!(!config.enabled);
    assert_eq!(config.timeout_seconds, 1);
    assert_eq!(config.interval_seconds, 5); // default
    assert_eq!(config.endpoint, "/patterns/names"); // default
}

// ============================================================================
// HealthCheckError
// ============================================================================

#[test]
fn test_error_timeout_display() {
    let err = HealthCheckError::Timeout(3000);
    assert_eq!(err.to_string(), "request timeout after 3000ms");
}

#[test]
fn test_error_http_display() {
    let err = HealthCheckError::HttpError(503);
    assert_eq!(err.to_string(), "HTTP error: 503");
}

// ============================================================================
// HttpHealthProber
// ============================================================================

#[tokio::test]
async fn test_probe_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/patterns/names")
        .with_status(200)
        .with_body(r#"["summarize","extract_wisdom"]"#)
        .create_async()
        .await;

    let prober = HttpHealthProber::new("/patterns/names");
    assert!(prober.probe(&server.url(), Duration::from_secs(2)).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_probe_trailing_slash_base_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/patterns/names")
        .with_status(200)
        .create_async()
        .await;

    let prober = HttpHealthProber::new("/patterns/names");
    let base = format!("{}/", server.url());
    assert!(prober.probe(&base, Duration::from_secs(2)).await);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_probe_non_success_status_is_false() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/patterns/names")
        .with_status(500)
        .create_async()
        .await;

    let prober = HttpHealthProber::new("/patterns/names");
    assert!(!prober.probe(&server.url(), Duration::from_secs(2)).await);
    assert!(matches!(
        prober.check(&server.url(), Duration::from_secs(2)).await,
        Err(HealthCheckError::HttpError(500))
    ));
}

#[tokio::test]
async fn test_probe_unreachable_is_false() {
    let prober = HttpHealthProber::new("/patterns/names");
    // Port 9 (discard) on loopback is almost never listening
    assert!(!prober.probe("http://127.0.0.1:9", Duration::from_millis(500)).await);
}

// ============================================================================
// HealthMonitor
// ============================================================================

/// Prober that replays a fixed script of outcomes, then repeats the last one.
struct ScriptedProbe {
    outcomes: Mutex<VecDeque<bool>>,
    last: Mutex<bool>,
}

impl ScriptedProbe {
    fn new(outcomes: &[bool]) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.iter().copied().collect()),
            last: Mutex::new(false),
        }
    }
}

#[async_trait]
impl HealthProbe for ScriptedProbe {
    async fn probe(&self, _base_url: &str, _timeout: Duration) -> bool {
        let next = self.outcomes.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(value) = next {
            *last = value;
        }
        *last
    }
}

#[tokio::test(start_paused = true)]
async fn test_monitor_emits_on_transitions_only() {
    let (tx, mut rx) = events::channel();
    let probe = Arc::new(ScriptedProbe::new(&[false, false, true, true, false]));
    let config = HealthCheckConfig {
        interval_seconds: 1,
        ..Default::default()
    };
    let monitor = HealthMonitor::new(probe, "http://localhost:8080", config, tx);
    let cancel = CancellationToken::new();
    let handle = monitor.start(cancel.clone());

    // Five ticks: immediate, then one per second
    tokio::time::sleep(Duration::from_millis(4500)).await;
    cancel.cancel();
    handle.await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push(event);
    }
    assert_eq!(
        seen,
        vec![
            AppEvent::ServerHealth { online: false },
            AppEvent::ServerHealth { online: true },
            AppEvent::ServerHealth { online: false },
        ]
    );
}

#[tokio::test]
async fn test_monitor_stops_on_cancel() {
    let probe = Arc::new(ScriptedProbe::new(&[true]));
    let monitor = HealthMonitor::new(
        probe,
        "http://localhost:8080",
        HealthCheckConfig::default(),
        crate::events::EventSender::disconnected(),
    );
    let cancel = CancellationToken::new();
    let handle = monitor.start(cancel.clone());
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("monitor should stop promptly")
        .unwrap();
}
