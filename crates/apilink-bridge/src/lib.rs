//! # apilink-bridge - Call Dispatcher for the UI/Backend Bridge
//!
//! Lets the UI process invoke a named remote operation on the privileged
//! backend process and receive a typed result or a typed failure, and
//! separately trigger the opening of a secondary UI surface by name.
//!
//! ```text
//! ┌──────────────┐  _api-<name>-request   ┌──────────────┐
//! │  UI process  │ ─────────────────────▶ │   backend    │
//! │  (ApiBridge) │ ◀───────────────────── │   process    │
//! └──────────────┘  _api-<name>-response  └──────────────┘
//! ```
//!
//! The messaging channel itself is a collaborator behind [`IpcTransport`];
//! [`InMemoryTransport`] backs tests and single-process runs.
//!
//! # Usage
//!
//! ```ignore
//! use apilink_bridge::{ApiBridge, InMemoryTransport};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(InMemoryTransport::new());
//! let bridge = ApiBridge::new(transport);
//! let result = bridge.call("get-config", &[]).await?;
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bridge;
pub mod config;
pub mod memory;
pub mod transport;

// Re-export main types
pub use bridge::ApiBridge;
pub use config::{BridgeConfig, ConfigError};
pub use memory::InMemoryTransport;
pub use transport::{
    ChannelSubscription, IncomingMessage, IpcTransport, MessageMeta, TransportError,
};
