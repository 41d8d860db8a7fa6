//! # Channel Naming
//!
//! Every remote endpoint owns two well-known channels on the messaging
//! transport, one per direction. The names are a pure function of the
//! endpoint name; the name itself is opaque and never validated.

use serde::{Deserialize, Serialize};

/// The two kinds of remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointKind {
    /// Bidirectional data call: request out, exactly one reply back.
    Data,
    /// Fire-and-forget trigger that opens a secondary UI surface.
    Window,
}

impl EndpointKind {
    /// Channel-name prefix for this kind.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Data => "_api",
            Self::Window => "_open",
        }
    }
}

/// The request/response channel names derived from an endpoint name.
///
/// Derivation is deterministic:
///
/// ```text
/// Data:   _api-<name>-request   /  _api-<name>-response
/// Window: _open-<name>-request  /  _open-<name>-response
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelPair {
    /// Channel the caller sends on.
    pub request: String,
    /// Channel the backend replies on.
    pub response: String,
}

impl ChannelPair {
    /// Derive the channel pair for an endpoint of the given kind.
    #[must_use]
    pub fn new(kind: EndpointKind, endpoint: &str) -> Self {
        let prefix = kind.prefix();
        Self {
            request: format!("{prefix}-{endpoint}-request"),
            response: format!("{prefix}-{endpoint}-response"),
        }
    }

    /// Channel pair for a data endpoint.
    #[must_use]
    pub fn data(endpoint: &str) -> Self {
        Self::new(EndpointKind::Data, endpoint)
    }

    /// Channel pair for a window endpoint.
    #[must_use]
    pub fn window(endpoint: &str) -> Self {
        Self::new(EndpointKind::Window, endpoint)
    }
}
