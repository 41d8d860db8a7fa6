//! # Error Types
//!
//! The failure taxonomy for remote calls. Rejecting the call is the only
//! error-reporting channel; callers decide how to present the messages.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a remote call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The backend reported failure; messages are surfaced verbatim, in order.
    #[error("request failed: {}", .0.join("; "))]
    Failed(Vec<String>),

    /// A payload failed to encode or decode as JSON.
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The reply message carried no payload string.
    #[error("empty response payload")]
    EmptyResponse,

    /// The transport dropped the response channel before a reply arrived.
    #[error("response channel closed")]
    ChannelClosed,

    /// The configured call deadline expired.
    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    /// The transport failed to send.
    #[error("transport send failed: {0}")]
    Transport(String),
}

impl CallError {
    /// The ordered backend error messages, when this is a backend failure.
    #[must_use]
    pub fn messages(&self) -> Option<&[String]> {
        match self {
            Self::Failed(messages) => Some(messages),
            _ => None,
        }
    }
}
