//! Error types for stream decoding.

use thiserror::Error;

/// Errors that end an event stream early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SseError {
    /// The underlying byte stream failed mid-read.
    #[error("error reading stream: {0}")]
    Transport(String),

    /// A single line exceeded the buffer limit.
    #[error("stream line exceeds {0} bytes")]
    LineTooLong(usize),
}
