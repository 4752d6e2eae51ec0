//! Error types for the chat relay.

use thiserror::Error;

/// Why a chat request did not complete. None of these record history.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The server answered `/chat` with a non-success status.
    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },

    /// The connection failed, or the stream broke or reported an error mid-way.
    #[error("stream error: {message}")]
    StreamError { message: String },

    /// The caller abandoned the request.
    #[error("request cancelled")]
    Cancelled,
}

impl RelayError {
    pub fn stream(message: impl Into<String>) -> Self {
        RelayError::StreamError {
            message: message.into(),
        }
    }
}
