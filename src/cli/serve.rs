//! Serve command implementation

use crate::app::App;
use crate::cli::output::{format_event, format_event_json};
use crate::cli::{load_config, ServeArgs};
use crate::config::{AppConfig, PreferencesStore};
use crate::health::HttpHealthProber;
use crate::logging::init_tracing;
use std::sync::Arc;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(args: &ServeArgs) -> anyhow::Result<AppConfig> {
    let mut config = load_config(&args.config, args.base_url.as_deref())?;

    if let Some(ref executable) = args.executable {
        config.server.executable = executable.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_health_check {
        config.health_check.enabled = false;
    }

    config.validate()?;
    Ok(config)
}

/// Use the base URL saved in preferences, unless `--base-url` was given.
pub fn apply_saved_base_url(
    config: AppConfig,
    args: &ServeArgs,
    store: Option<&PreferencesStore>,
) -> AppConfig {
    if args.base_url.is_some() {
        return config;
    }
    let saved = store.and_then(PreferencesStore::saved_base_url);
    config.with_saved_base_url(saved.as_deref())
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
    }
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    // 1. Load and merge configuration
    let config = load_config_with_overrides(&args)?;

    // 2. Initialize tracing
    init_tracing(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    tracing::debug!(?config, "Loaded configuration");

    // 3. Preferences
    let store = match &args.preferences {
        Some(path) => Some(PreferencesStore::new(path)),
        None => PreferencesStore::default_location().ok(),
    };
    let config = apply_saved_base_url(config, &args, store.as_ref());
    let preferences = store.as_ref().map(PreferencesStore::load).unwrap_or_default();

    let prober = Arc::new(HttpHealthProber::from_config(&config.health_check));
    let (mut app, mut events) = App::with_prober(config, preferences, prober);

    // 4. Start the server and the health monitor
    tracing::info!(base_url = %app.base_url(), "Starting pattern server");
    app.supervisor().start().await?;
    if app.config().health_check.enabled {
        app.start_health_monitor();
    }

    // 5. Print events until interrupted
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            event = events.recv() => match event {
                Some(event) if args.json => println!("{}", format_event_json(&event)),
                Some(event) => println!("{}", format_event(&event)),
                None => break,
            },
        }
    }

    // 6. Cleanup
    app.shutdown().await?;
    while let Ok(event) = events.try_recv() {
        if args.json {
            println!("{}", format_event_json(&event));
        } else {
            println!("{}", format_event(&event));
        }
    }

    tracing::info!("fabric-desk stopped");
    Ok(())
}
