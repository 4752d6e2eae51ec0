//! Streaming chat relay.
//!
//! Sends one `/chat` request, decodes the SSE response, emits `chat:*` events as
//! text arrives and records the finished exchange in the shared history buffer.
//! History is written only after a completed stream; transport failures,
//! in-band error records and cancellation leave it untouched.

mod error;
mod types;

pub use error::RelayError;
pub use types::{ChatRequest, ChatWireRequest, PromptRequest};

use crate::events::{AppEvent, EventSender};
use crate::history::{HistoryBuffer, HistoryEntry};
use crate::sse::{self, StreamEvent};
use futures::{Stream, StreamExt};
use reqwest::header::ACCEPT;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Drives chat requests against one server.
#[derive(Clone)]
pub struct StreamRelay {
    client: reqwest::Client,
    base_url: String,
    history: Arc<HistoryBuffer>,
    events: EventSender,
}

impl StreamRelay {
    pub fn new(base_url: impl Into<String>, history: Arc<HistoryBuffer>, events: EventSender) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, history, events)
    }

    /// Create a relay with a custom HTTP client (for testing or shared pools).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        history: Arc<HistoryBuffer>,
        events: EventSender,
    ) -> Self {
        Self {
            client,
            base_url: crate::config::normalize_base_url(&base_url.into()),
            history,
            events,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn history(&self) -> &Arc<HistoryBuffer> {
        &self.history
    }

    /// Send a request and stream the answer.
    ///
    /// Emits `chat:chunk` per increment, then `chat:complete`; on failure emits
    /// `chat:error`. Performs exactly one network exchange. Dropping the returned
    /// future abandons the connection and records nothing.
    pub async fn send(&self, request: ChatRequest) -> Result<String, RelayError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "chat",
            request_id = %request_id,
            pattern = %request.pattern,
            vendor = %request.vendor,
            model = %request.model,
        );

        let result = self.exchange(&request).instrument(span).await;
        if let Err(e) = &result {
            tracing::warn!(request_id = %request_id, error = %e, "Chat request failed");
            self.events.emit(AppEvent::ChatError(e.to_string()));
        }
        result
    }

    /// Like [`send`](Self::send), but returns [`RelayError::Cancelled`] as soon as
    /// `cancel` fires.
    pub async fn send_with_cancel(
        &self,
        request: ChatRequest,
        cancel: CancellationToken,
    ) -> Result<String, RelayError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!(pattern = %request.pattern, "Chat request cancelled");
                let err = RelayError::Cancelled;
                self.events.emit(AppEvent::ChatError(err.to_string()));
                Err(err)
            }
            result = self.send(request.clone()) => result,
        }
    }

    async fn exchange(&self, request: &ChatRequest) -> Result<String, RelayError> {
        let url = format!("{}/chat", self.base_url);
        tracing::debug!(url = %url, input_len = request.input.len(), "Sending chat request");

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "text/event-stream")
            .json(&ChatWireRequest::from(request))
            .send()
            .await
            .map_err(|e| RelayError::stream(format!("failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        self.relay(request, response.bytes_stream()).await
    }

    /// Consume an SSE byte stream for `request`.
    pub async fn relay<S, B, E>(&self, request: &ChatRequest, bytes: S) -> Result<String, RelayError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let events = sse::decode_stream(bytes);
        futures::pin_mut!(events);

        let mut transcript = String::new();
        let mut chunks = 0usize;

        while let Some(event) = events.next().await {
            match event {
                Ok(StreamEvent::Content(text)) => {
                    chunks += 1;
                    transcript.push_str(&text);
                    self.events.emit(AppEvent::ChatChunk(text));
                }
                Ok(StreamEvent::Complete) => break,
                Ok(StreamEvent::Error(message)) => return Err(RelayError::StreamError { message }),
                Err(e) => return Err(RelayError::stream(e.to_string())),
            }
        }

        self.events.emit(AppEvent::ChatComplete);
        self.history.append(HistoryEntry::new(
            request.pattern.clone(),
            request.model.clone(),
            request.input.clone(),
            transcript.clone(),
        ));

        tracing::info!(chunks, output_len = transcript.len(), "Chat completed");
        Ok(transcript)
    }
}
