//! Integration tests for the supervisor and app with the HTTP prober.
//!
//! `sleep` stands in for the pattern server; a mock server answers health probes.

#![cfg(unix)]

mod common;

use common::drain;
use fabric_desk::config::{AppConfig, Preferences, ServerConfig};
use fabric_desk::events::{self, AppEvent};
use fabric_desk::health::{HealthProbe, HttpHealthProber};
use fabric_desk::supervisor::{ProcessSupervisor, ServerState};
use fabric_desk::App;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_config(base_url: &str) -> ServerConfig {
    ServerConfig {
        base_url: base_url.to_string(),
        executable: "sleep".to_string(),
        args: vec!["30".to_string()],
        pass_address: false,
        startup_grace_ms: 50,
        retry_grace_ms: 50,
    }
}

fn prober() -> Arc<dyn HealthProbe> {
    Arc::new(HttpHealthProber::new("/patterns/names"))
}

async fn healthy_server() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/patterns/names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["summarize"])))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_start_reports_healthy_server() {
    let mock_server = healthy_server().await;
    let (tx, mut rx) = events::channel();
    let supervisor = ProcessSupervisor::new(server_config(&mock_server.uri()), prober(), tx);

    supervisor.start().await.unwrap();
    assert_eq!(supervisor.state(), ServerState::Running);
    assert!(supervisor.is_running().await);

    supervisor.stop().await.unwrap();
    assert!(!supervisor.is_running().await);
    assert_eq!(
        drain(&mut rx),
        vec![
            AppEvent::ServerStarted { healthy: true },
            AppEvent::ServerStopped
        ]
    );
}

#[tokio::test]
async fn test_start_without_health_endpoint_still_running() {
    // No mounted mocks: every probe gets a 404
    let mock_server = MockServer::start().await;
    let (tx, mut rx) = events::channel();
    let supervisor = ProcessSupervisor::new(server_config(&mock_server.uri()), prober(), tx);

    supervisor.start().await.unwrap();

    assert_eq!(supervisor.state(), ServerState::Running);
    assert_eq!(drain(&mut rx), vec![AppEvent::ServerStarted { healthy: false }]);
    let probes = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(probes.len(), 2);

    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_starts_spawn_one_process() {
    let mock_server = healthy_server().await;
    let (tx, _rx) = events::channel();
    let supervisor = Arc::new(ProcessSupervisor::new(
        server_config(&mock_server.uri()),
        prober(),
        tx,
    ));

    let a = tokio::spawn({
        let supervisor = Arc::clone(&supervisor);
        async move { supervisor.start().await }
    });
    let b = tokio::spawn({
        let supervisor = Arc::clone(&supervisor);
        async move { supervisor.start().await }
    });
    let results = [a.await.unwrap(), b.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(supervisor.is_running().await);
    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn test_app_uses_running_server_without_spawning() {
    let mock_server = healthy_server().await;
    let mut config = AppConfig::default();
    config.server = server_config(&mock_server.uri());
    config.server.executable = "definitely-not-a-real-binary-5f2c".to_string();
    config.health_check.interval_seconds = 1;

    let (mut app, mut rx) = App::with_prober(config, Preferences::default(), prober());

    app.startup().await.unwrap();
    assert!(!app.supervisor().is_running().await);

    let event = tokio::time::timeout(Duration::from_secs(3), rx.recv())
        .await
        .unwrap();
    assert_eq!(event, Some(AppEvent::ServerHealth { online: true }));

    let patterns = app.catalog().patterns().await.unwrap();
    assert_eq!(patterns, vec!["summarize"]);

    app.shutdown().await.unwrap();
}
