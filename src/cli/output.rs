//! Output formatting helpers for CLI commands

use crate::catalog::ModelsResponse;
use crate::events::AppEvent;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// View model for one vendor/model pair
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ModelView {
    pub vendor: String,
    pub model: String,
}

/// Flatten a models response into vendor/model rows, optionally for one vendor.
///
/// Models the server lists without a vendor are shown under `-`.
pub fn model_views(models: &ModelsResponse, vendor: Option<&str>) -> Vec<ModelView> {
    let mut views = Vec::new();
    for (name, vendor_models) in &models.vendors {
        if vendor.is_some_and(|v| !v.eq_ignore_ascii_case(name)) {
            continue;
        }
        for model in vendor_models {
            views.push(ModelView {
                vendor: name.clone(),
                model: model.clone(),
            });
        }
    }

    if vendor.is_none() {
        for model in &models.models {
            if models.vendor_of(model).is_none() {
                views.push(ModelView {
                    vendor: "-".to_string(),
                    model: model.clone(),
                });
            }
        }
    }

    views
}

/// Format patterns as a table
pub fn format_patterns_table(patterns: &[String]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Pattern"]);

    for pattern in patterns {
        table.add_row(vec![Cell::new(pattern)]);
    }

    table.to_string()
}

/// Format patterns as JSON
pub fn format_patterns_json(patterns: &[String]) -> String {
    serde_json::to_string_pretty(&json!({ "patterns": patterns })).unwrap_or_default()
}

/// Format models as a table
pub fn format_models_table(models: &[ModelView]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Vendor", "Model"]);

    for m in models {
        table.add_row(vec![Cell::new(&m.vendor), Cell::new(&m.model)]);
    }

    table.to_string()
}

/// Format models as JSON
pub fn format_models_json(models: &[ModelView]) -> String {
    serde_json::to_string_pretty(&json!({ "models": models })).unwrap_or_default()
}

/// One human-readable line per event.
pub fn format_event(event: &AppEvent) -> String {
    match event {
        AppEvent::ServerStarted { healthy: true } => {
            format!("{} Server started", "✓".green())
        }
        AppEvent::ServerStarted { healthy: false } => format!(
            "{} Server started but is not answering yet",
            "!".yellow()
        ),
        AppEvent::ServerStopped => format!("{} Server stopped", "■".cyan()),
        AppEvent::ServerLog(line) => format!("{} {}", "[server]".dimmed(), line),
        AppEvent::ServerHealth { online: true } => format!("{} Server online", "✓".green()),
        AppEvent::ServerHealth { online: false } => format!("{} Server offline", "✗".red()),
        AppEvent::ChatChunk(text) => text.clone(),
        AppEvent::ChatError(message) => format!("{} {}", "✗".red(), message),
        AppEvent::ChatComplete => format!("{} Done", "✓".green()),
    }
}

/// Event as a JSON line, or an empty object if it cannot be serialized.
pub fn format_event_json(event: &AppEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
}
