//! # Transport Seam
//!
//! The inter-process messaging transport as seen by the dispatcher: a
//! fire-and-forget send, a blocking send that returns on receipt
//! acknowledgment, and per-channel listener registration. Delivery is
//! `(metadata, payload)` pairs; dropping a subscription unregisters its
//! listener.

use apilink_types::CallError;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from the messaging transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// A send could not be carried out.
    #[error("send on {channel} failed: {reason}")]
    SendFailed {
        /// Channel the send was addressed to.
        channel: String,
        /// Transport-specific reason.
        reason: String,
    },
}

impl From<TransportError> for CallError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Metadata delivered alongside each message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageMeta {
    /// Channel the message arrived on.
    pub channel: String,
}

/// One message delivered to a channel listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Delivery metadata.
    pub meta: MessageMeta,
    /// Ordered string payloads carried by the message.
    pub payload: Vec<String>,
}

/// The inter-process messaging transport.
#[async_trait]
pub trait IpcTransport: Send + Sync {
    /// Fire-and-forget send of a sequence of string payloads.
    async fn send(&self, channel: &str, payload: Vec<String>) -> Result<(), TransportError>;

    /// Send one payload and block until the peer acknowledges receipt.
    ///
    /// Only receipt is awaited, not the peer's processing of the message.
    fn send_sync(&self, channel: &str, payload: String) -> Result<(), TransportError>;

    /// Register a listener on a channel.
    fn subscribe(&self, channel: &str) -> ChannelSubscription;
}

/// A registered channel listener.
///
/// Dropping the subscription unregisters the listener; no further messages
/// are delivered after that point.
pub struct ChannelSubscription {
    channel: String,
    receiver: mpsc::UnboundedReceiver<IncomingMessage>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl ChannelSubscription {
    /// Build a subscription from a delivery queue and an unregistration hook.
    pub fn new(
        channel: impl Into<String>,
        receiver: mpsc::UnboundedReceiver<IncomingMessage>,
        unsubscribe: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            channel: channel.into(),
            receiver,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Channel this subscription listens on.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Receive the next message.
    ///
    /// Returns `None` when the transport dropped the channel.
    pub async fn recv(&mut self) -> Option<IncomingMessage> {
        self.receiver.recv().await
    }
}

impl Drop for ChannelSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for ChannelSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelSubscription")
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
