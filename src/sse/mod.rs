//! Server-sent event decoding for `/chat` responses.
//!
//! The server frames each record as a `data: {json}` line. Decoding is forward-only:
//! a `complete` record ends the sequence even when bytes remain, and end of input
//! without one is an implicit completion.

mod decoder;
mod error;

pub use decoder::{decode_line, SseDecoder};
pub use error::SseError;

use futures::{Stream, StreamExt};
use serde::Deserialize;

/// Longest accepted line, in bytes.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Wire record carried by each data line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub format: Option<String>,
}

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental output text
    Content(String),
    /// Authoritative end of stream
    Complete,
    /// In-band failure reported by the server
    Error(String),
}

/// Decode a byte stream into a lazy, single-pass event stream.
///
/// The returned stream ends right after yielding [`StreamEvent::Complete`], or after
/// the first error. Input ending without a `complete` record simply ends the stream.
pub fn decode_stream<S, B, E>(bytes: S) -> impl Stream<Item = Result<StreamEvent, SseError>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    async_stream::stream! {
        let mut decoder = SseDecoder::new();
        futures::pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(SseError::Transport(e.to_string()));
                    return;
                }
            };

            match decoder.feed(chunk.as_ref()) {
                Ok(events) => {
                    for event in events {
                        yield Ok(event);
                    }
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }

            if decoder.is_finished() {
                return;
            }
        }

        for event in decoder.finish() {
            yield Ok(event);
        }
    }
}
