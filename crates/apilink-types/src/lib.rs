//! # apilink-types - Wire-Level Vocabulary for the UI/Backend Bridge
//!
//! Defines everything that crosses the messaging transport between the UI
//! process and the privileged backend process:
//!
//! - **Channel naming** ([`ChannelPair`]): the well-known request/response
//!   channel names derived from an endpoint name.
//! - **Value codec** ([`WireValue`]): the JSON value model, with strict
//!   RFC 3339 strings revived to native timestamps during parsing.
//! - **Response envelope** ([`ResponsePayload`]): the two reply protocols
//!   (current `{errors, result}` envelope vs. legacy bare value) and how a
//!   call settles from them.
//! - **Errors** ([`CallError`]): the failure taxonomy surfaced to callers.
//!
//! The transport itself and the dispatcher live in `apilink-bridge`.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod channel;
pub mod envelope;
pub mod error;
pub mod value;

// Re-export main types
pub use channel::{ChannelPair, EndpointKind};
pub use envelope::{ResponsePayload, UNKNOWN_ERROR};
pub use error::CallError;
pub use value::{decode_payload, encode_args, WireValue};
