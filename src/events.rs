//! Typed notifications emitted by the core for the UI layer.
//!
//! Every producer (supervisor log readers, the stream relay, the health monitor)
//! holds a cloned [`EventSender`]. The channel is unbounded so emitting never blocks
//! the producer, and events from a single producer arrive in emission order.

use serde::Serialize;
use tokio::sync::mpsc;

/// A notification for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "topic", content = "payload")]
pub enum AppEvent {
    /// Server process spawned and declared running.
    #[serde(rename = "server:started")]
    ServerStarted {
        /// Whether the post-start health probe succeeded
        healthy: bool,
    },
    /// Server process terminated by `stop()`.
    #[serde(rename = "server:stopped")]
    ServerStopped,
    /// One line of child-process output.
    #[serde(rename = "server:log")]
    ServerLog(String),
    /// Health monitor observed a reachability change.
    #[serde(rename = "server:health")]
    ServerHealth { online: bool },
    /// Incremental chat text.
    #[serde(rename = "chat:chunk")]
    ChatChunk(String),
    /// Chat request failed.
    #[serde(rename = "chat:error")]
    ChatError(String),
    /// Chat request finished; always the last event of a successful request.
    #[serde(rename = "chat:complete")]
    ChatComplete,
}

impl AppEvent {
    /// Topic name used by the UI event bus.
    pub fn topic(&self) -> &'static str {
        match self {
            AppEvent::ServerStarted { .. } => "server:started",
            AppEvent::ServerStopped => "server:stopped",
            AppEvent::ServerLog(_) => "server:log",
            AppEvent::ServerHealth { .. } => "server:health",
            AppEvent::ChatChunk(_) => "chat:chunk",
            AppEvent::ChatError(_) => "chat:error",
            AppEvent::ChatComplete => "chat:complete",
        }
    }
}

/// Producer half of the event channel.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<AppEvent>,
}

/// Consumer half of the event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

impl EventSender {
    /// Emit an event. A closed receiver is not an error: nobody is listening.
    pub fn emit(&self, event: AppEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Event receiver dropped, discarding event");
        }
    }

    /// Sender whose events go nowhere, for headless callers.
    pub fn disconnected() -> Self {
        let (tx, _) = mpsc::unbounded_channel();
        Self { tx }
    }
}

/// Create a new event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_match_ui_contract() {
        assert_eq!(AppEvent::ServerStarted { healthy: true }.topic(), "server:started");
        assert_eq!(AppEvent::ServerStopped.topic(), "server:stopped");
        assert_eq!(AppEvent::ServerLog("x".into()).topic(), "server:log");
        assert_eq!(AppEvent::ServerHealth { online: false }.topic(), "server:health");
        assert_eq!(AppEvent::ChatChunk("x".into()).topic(), "chat:chunk");
        assert_eq!(AppEvent::ChatError("x".into()).topic(), "chat:error");
        assert_eq!(AppEvent::ChatComplete.topic(), "chat:complete");
    }

    #[test]
    fn test_serialized_tag_equals_topic() {
        let event = AppEvent::ChatChunk("Hel".to_string());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["topic"], "chat:chunk");
        assert_eq!(json["payload"], "Hel");
    }

    #[tokio::test]
    async fn test_events_arrive_in_emission_order() {
        let (tx, mut rx) = channel();
        tx.emit(AppEvent::ChatChunk("a".into()));
        tx.emit(AppEvent::ChatChunk("b".into()));
        tx.emit(AppEvent::ChatComplete);

        assert_eq!(rx.recv().await, Some(AppEvent::ChatChunk("a".into())));
        assert_eq!(rx.recv().await, Some(AppEvent::ChatChunk("b".into())));
        assert_eq!(rx.recv().await, Some(AppEvent::ChatComplete));
    }

    #[test]
    fn test_emit_after_receiver_dropped_does_not_panic() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit(AppEvent::ServerStopped);
        EventSender::disconnected().emit(AppEvent::ServerStopped);
    }
}
