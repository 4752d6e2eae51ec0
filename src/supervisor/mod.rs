//! Lifecycle supervision of the local pattern server process.
//!
//! One [`ProcessSupervisor`] owns at most one child process. `start`, `stop` and
//! `is_running` serialize on a single async mutex which is held across the grace
//! waits and the exit wait, so lifecycle transitions never overlap. Output
//! forwarding runs on spawned tasks that never touch the lock.

mod error;
mod launch;
mod state;


pub use error::SupervisorError;
pub use launch::{build_args, is_noise_line, port_from_base_url, resolve_executable};
pub use state::ServerState;

use crate::config::ServerConfig;
use crate::events::{AppEvent, EventSender};
use crate::health::HealthProbe;
use std::collections::VecDeque;
use std::process::Stdio;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{watch, Mutex};

/// Number of recent server output lines kept for diagnostics.
pub const RECENT_LOG_LINES: usize = 50;

const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

struct Inner {
    state: ServerState,
    child: Option<Child>,
}

/// Owns the server child process and its [`ServerState`].
pub struct ProcessSupervisor {
    config: ServerConfig,
    prober: Arc<dyn HealthProbe>,
    probe_timeout: Duration,
    events: EventSender,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<ServerState>,
    recent_logs: Arc<StdMutex<VecDeque<String>>>,
}

impl ProcessSupervisor {
    pub fn new(config: ServerConfig, prober: Arc<dyn HealthProbe>, events: EventSender) -> Self {
        let (state_tx, _) = watch::channel(ServerState::Stopped);
        Self {
            config,
            prober,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            events,
            inner: Mutex::new(Inner {
                state: ServerState::Stopped,
                child: None,
            }),
            state_tx,
            recent_logs: Arc::new(StdMutex::new(VecDeque::with_capacity(RECENT_LOG_LINES))),
        }
    }

    /// Timeout used for each post-start health probe.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Current lifecycle state. Does not wait for an in-flight start/stop.
    pub fn state(&self) -> ServerState {
        *self.state_tx.borrow()
    }

    /// Observe every state transition.
    pub fn subscribe_state(&self) -> watch::Receiver<ServerState> {
        self.state_tx.subscribe()
    }

    /// The last [`RECENT_LOG_LINES`] lines of server output, oldest first.
    pub fn recent_logs(&self) -> Vec<String> {
        self.recent_logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Spawn the server and wait for it to come up.
    ///
    /// The state becomes `Running` once the process is spawned, whether or not the
    /// health probes succeed; `server:started` carries the probe outcome.
    pub async fn start(&self) -> Result<(), SupervisorError> {
        let mut inner = self.inner.lock().await;

        if inner.state.is_active() {
            if child_alive(&mut inner.child) {
                tracing::warn!("Server is already running");
                return Err(SupervisorError::AlreadyRunning);
            }
            tracing::warn!("Server process exited on its own, resetting state");
            inner.child = None;
            self.set_state(&mut inner, ServerState::Stopped);
        }

        let program = resolve_executable(&self.config.executable).ok_or_else(|| {
            tracing::error!(executable = %self.config.executable, "Server executable not found");
            SupervisorError::ExecutableNotFound(self.config.executable.clone())
        })?;
        let args = build_args(&self.config);

        self.set_state(&mut inner, ServerState::Starting);

        let mut command = Command::new(&program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::error!(program = %program.display(), error = %e, "Failed to spawn server");
                self.set_state(&mut inner, ServerState::Stopped);
                return Err(SupervisorError::ProcessSpawnFailed(e.to_string()));
            }
        };

        tracing::info!(
            pid = child.id(),
            program = %program.display(),
            args = ?args,
            base_url = %self.config.base_url,
            "Server process started"
        );

        self.clear_recent_logs();
        if let Some(stdout) = child.stdout.take() {
            self.spawn_output_forwarder(stdout, "stdout");
        }
        if let Some(stderr) = child.stderr.take() {
            self.spawn_output_forwarder(stderr, "stderr");
        }
        inner.child = Some(child);

        tokio::time::sleep(self.config.startup_grace()).await;
        let mut healthy = self
            .prober
            .probe(&self.config.base_url, self.probe_timeout)
            .await;
        if !healthy {
            tracing::debug!("Server not answering yet, waiting before retry");
            tokio::time::sleep(self.config.retry_grace()).await;
            healthy = self
                .prober
                .probe(&self.config.base_url, self.probe_timeout)
                .await;
        }

        if healthy {
            tracing::info!("Server is healthy");
        } else {
            tracing::warn!(
                base_url = %self.config.base_url,
                "Server process is running but not answering health probes"
            );
        }

        self.set_state(&mut inner, ServerState::Running);
        self.events.emit(AppEvent::ServerStarted { healthy });
        Ok(())
    }

    /// Kill the server and wait for it to exit. A no-op when already stopped.
    pub async fn stop(&self) -> Result<(), SupervisorError> {
        let mut inner = self.inner.lock().await;

        if inner.state == ServerState::Stopped {
            return Ok(());
        }

        let Some(mut child) = inner.child.take() else {
            self.set_state(&mut inner, ServerState::Stopped);
            return Ok(());
        };

        self.set_state(&mut inner, ServerState::Stopping);
        let pid = child.id();
        tracing::info!(pid, "Stopping server");

        let result = match child.try_wait() {
            Ok(Some(status)) => {
                tracing::info!(pid, %status, "Server had already exited");
                Ok(())
            }
            _ => child.kill().await,
        };

        if let Err(e) = result {
            tracing::error!(pid, error = %e, "Failed to stop server");
            inner.child = Some(child);
            self.set_state(&mut inner, ServerState::Running);
            return Err(SupervisorError::StopFailed(e.to_string()));
        }

        self.set_state(&mut inner, ServerState::Stopped);
        self.events.emit(AppEvent::ServerStopped);
        tracing::info!(pid, "Server stopped");
        Ok(())
    }

    /// True iff a process is owned and has not exited. Says nothing about health.
    pub async fn is_running(&self) -> bool {
        let mut inner = self.inner.lock().await;
        child_alive(&mut inner.child)
    }

    /// OS process id of the owned child, if any.
    pub async fn pid(&self) -> Option<u32> {
        let inner = self.inner.lock().await;
        inner.child.as_ref().and_then(Child::id)
    }

    fn set_state(&self, inner: &mut Inner, state: ServerState) {
        if inner.state != state {
            tracing::debug!(from = %inner.state, to = %state, "Server state transition");
        }
        inner.state = state;
        self.state_tx.send_replace(state);
    }

    fn clear_recent_logs(&self) {
        self.recent_logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn spawn_output_forwarder<R>(&self, reader: R, stream: &'static str)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let events = self.events.clone();
        let recent = Arc::clone(&self.recent_logs);

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(stream, error = %e, "Server output closed");
                        break;
                    }
                }

                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                if line.trim().is_empty() || is_noise_line(line) {
                    continue;
                }

                tracing::debug!(stream, line, "Server output");
                {
                    let mut recent = recent.lock().unwrap_or_else(PoisonError::into_inner);
                    if recent.len() >= RECENT_LOG_LINES {
                        recent.pop_front();
                    }
                    recent.push_back(line.to_string());
                }
                events.emit(AppEvent::ServerLog(line.to_string()));
            }
        });
    }
}

/// A try_wait error is treated as "still alive" so a second process is never spawned
/// over one we cannot observe.
fn child_alive(child: &mut Option<Child>) -> bool {
    match child {
        Some(child) => !matches!(child.try_wait(), Ok(Some(_))),
        None => false,
    }
}
