//! Application assembly.
//!
//! [`App`] wires configuration, preferences, the process supervisor, the chat relay
//! and the catalog client around one shared [`HistoryBuffer`] and one event channel.

use crate::catalog::CatalogClient;
use crate::config::{AppConfig, ConfigError, Preferences, PreferencesStore};
use crate::events::{self, EventReceiver, EventSender};
use crate::health::{HealthMonitor, HealthProbe, HttpHealthProber};
use crate::history::HistoryBuffer;
use crate::relay::StreamRelay;
use crate::supervisor::{ProcessSupervisor, SupervisorError};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct App {
    config: AppConfig,
    preferences: Preferences,
    store: Option<PreferencesStore>,
    prober: Arc<dyn HealthProbe>,
    history: Arc<HistoryBuffer>,
    supervisor: Arc<ProcessSupervisor>,
    relay: StreamRelay,
    catalog: CatalogClient,
    events: EventSender,
    cancel_token: CancellationToken,
    monitor: Option<JoinHandle<()>>,
}

impl App {
    /// Build the app from config plus preferences read from `store`.
    ///
    /// Only a base URL actually present in the preferences file overrides the
    /// configured one. Otherwise `baseUrl` is left empty so saving preferences
    /// does not pin the built-in default.
    pub fn new(config: AppConfig, store: PreferencesStore) -> (Self, EventReceiver) {
        let saved_base_url = store.saved_base_url();
        let config = config.with_saved_base_url(saved_base_url.as_deref());
        let mut preferences = store.load();
        if saved_base_url.is_none() {
            preferences.base_url.clear();
        }
        let prober = Arc::new(HttpHealthProber::from_config(&config.health_check));
        let (mut app, rx) = Self::with_prober(config, preferences, prober);
        app.store = Some(store);
        (app, rx)
    }

    /// Build the app with an explicit probe and no preferences file.
    ///
    /// `config` is used as given; `preferences.base_url` is not applied.
    pub fn with_prober(
        config: AppConfig,
        preferences: Preferences,
        prober: Arc<dyn HealthProbe>,
    ) -> (Self, EventReceiver) {
        let (events, rx) = events::channel();
        let history = Arc::new(HistoryBuffer::new());
        let timeout = Duration::from_secs(config.health_check.timeout_seconds);

        let supervisor = Arc::new(
            ProcessSupervisor::new(config.server.clone(), Arc::clone(&prober), events.clone())
                .with_probe_timeout(timeout),
        );
        let relay = StreamRelay::new(
            config.server.base_url.clone(),
            Arc::clone(&history),
            events.clone(),
        );
        let catalog = CatalogClient::new(config.server.base_url.clone());

        let app = Self {
            config,
            preferences,
            store: None,
            prober,
            history,
            supervisor,
            relay,
            catalog,
            events,
            cancel_token: CancellationToken::new(),
            monitor: None,
        };
        (app, rx)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.server.base_url
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn history(&self) -> &Arc<HistoryBuffer> {
        &self.history
    }

    pub fn supervisor(&self) -> &Arc<ProcessSupervisor> {
        &self.supervisor
    }

    pub fn relay(&self) -> &StreamRelay {
        &self.relay
    }

    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    pub fn events(&self) -> &EventSender {
        &self.events
    }

    /// Probe the server once with the configured timeout.
    pub async fn server_reachable(&self) -> bool {
        let timeout = Duration::from_secs(self.config.health_check.timeout_seconds);
        self.prober.probe(self.base_url(), timeout).await
    }

    /// Auto-start the server if preferred and not already reachable, then start the
    /// health monitor when enabled.
    pub async fn startup(&mut self) -> Result<(), SupervisorError> {
        if self.preferences.auto_start_server {
            if self.server_reachable().await {
                tracing::info!(base_url = %self.base_url(), "Server already reachable, not starting");
            } else {
                tracing::info!("Auto-starting server");
                self.supervisor.start().await?;
            }
        }

        if self.config.health_check.enabled {
            self.start_health_monitor();
        }

        Ok(())
    }

    /// Start periodic `server:health` reporting. No-op if already started.
    pub fn start_health_monitor(&mut self) {
        if self.monitor.is_some() {
            return;
        }
        let monitor = HealthMonitor::new(
            Arc::clone(&self.prober),
            self.config.server.base_url.clone(),
            self.config.health_check.clone(),
            self.events.clone(),
        );
        self.monitor = Some(monitor.start(self.cancel_token.clone()));
    }

    /// Stop background tasks and the managed server.
    pub async fn shutdown(&mut self) -> Result<(), SupervisorError> {
        self.cancel_token.cancel();
        if let Some(handle) = self.monitor.take() {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Health monitor task failed");
            }
        }
        self.supervisor.stop().await
    }

    /// Remember the last selection and persist preferences, if a store is attached.
    pub fn remember_selection(
        &mut self,
        pattern: &str,
        vendor: &str,
        model: &str,
    ) -> Result<(), ConfigError> {
        self.preferences.last_pattern = pattern.to_string();
        self.preferences.last_vendor = vendor.to_string();
        self.preferences.last_model = model.to_string();
        self.save_preferences()
    }

    /// Replace preferences and persist them. A new base URL applies on the next start.
    pub fn update_preferences(&mut self, preferences: Preferences) -> Result<(), ConfigError> {
        self.preferences = preferences;
        self.save_preferences()
    }

    fn save_preferences(&self) -> Result<(), ConfigError> {
        match &self.store {
            Some(store) => store.save(&self.preferences),
            None => Ok(()),
        }
    }
}
