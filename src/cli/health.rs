//! Health command implementation

use crate::cli::{load_config, HealthArgs};
use crate::health::HttpHealthProber;
use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use std::time::{Duration, Instant};

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub base_url: String,
    pub endpoint: String,
    pub online: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn format_health_pretty(report: &HealthReport) -> String {
    let mut output = String::new();

    let status = if report.online {
        "Online".green()
    } else {
        "Offline".red()
    };

    let _ = writeln!(output, "Server: {}", report.base_url);
    let _ = writeln!(output, "Status: {}", status);
    if report.online {
        let _ = writeln!(output, "Latency: {}ms", report.latency_ms);
    }
    if let Some(error) = &report.error {
        let _ = writeln!(output, "Reason: {}", error);
    }

    output
}

/// Handle `fabric-desk health`
///
/// An unreachable server is a report, not a failure.
pub async fn handle_health(args: &HealthArgs) -> anyhow::Result<String> {
    let config = load_config(&args.config, args.base_url.as_deref())?;
    let prober = HttpHealthProber::from_config(&config.health_check);
    let timeout = Duration::from_secs(config.health_check.timeout_seconds);

    let started = Instant::now();
    let result = prober.check(&config.server.base_url, timeout).await;
    let report = HealthReport {
        base_url: config.server.base_url.clone(),
        endpoint: config.health_check.endpoint.clone(),
        online: result.is_ok(),
        latency_ms: started.elapsed().as_millis() as u64,
        error: result.err().map(|e| e.to_string()),
    };

    if args.json {
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(format_health_pretty(&report))
    }
}
