//! # In-Memory Transport
//!
//! Single-process implementation of [`IpcTransport`] backing tests and
//! local runs. Keeps a per-channel listener registry; sends fan out to every
//! listener registered on the channel at delivery time. A send with no
//! listeners is dropped with a warning, mirroring a misconfigured channel
//! name.

use crate::transport::{
    ChannelSubscription, IncomingMessage, IpcTransport, MessageMeta, TransportError,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

type ListenerId = u64;
type Registry = DashMap<String, Vec<(ListenerId, mpsc::UnboundedSender<IncomingMessage>)>>;

/// In-memory messaging transport.
pub struct InMemoryTransport {
    /// Per-channel listener registry.
    listeners: Arc<Registry>,
    /// Listener ID allocator.
    next_id: AtomicU64,
}

impl InMemoryTransport {
    /// Create an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Number of listeners currently registered on a channel.
    #[must_use]
    pub fn listener_count(&self, channel: &str) -> usize {
        self.listeners.get(channel).map_or(0, |entry| entry.len())
    }

    /// Deliver a message to every listener on the channel.
    ///
    /// Returns the number of listeners reached.
    fn deliver(&self, channel: &str, payload: Vec<String>) -> usize {
        let Some(entry) = self.listeners.get(channel) else {
            warn!(channel, "Message dropped (no listeners)");
            return 0;
        };

        let mut delivered = 0;
        for (_, sender) in entry.iter() {
            let message = IncomingMessage {
                meta: MessageMeta {
                    channel: channel.to_owned(),
                },
                payload: payload.clone(),
            };
            if sender.send(message).is_ok() {
                delivered += 1;
            }
        }

        debug!(channel, delivered, "Message delivered");
        delivered
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IpcTransport for InMemoryTransport {
    async fn send(&self, channel: &str, payload: Vec<String>) -> Result<(), TransportError> {
        self.deliver(channel, payload);
        Ok(())
    }

    fn send_sync(&self, channel: &str, payload: String) -> Result<(), TransportError> {
        // Receipt is acknowledged once every listener queue has accepted the
        // message; processing is not awaited.
        self.deliver(channel, vec![payload]);
        Ok(())
    }

    fn subscribe(&self, channel: &str) -> ChannelSubscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.listeners
            .entry(channel.to_owned())
            .or_default()
            .push((id, tx));
        debug!(channel, id, "Listener registered");

        let registry = Arc::clone(&self.listeners);
        let channel_name = channel.to_owned();
        ChannelSubscription::new(channel, rx, move || {
            if let Some(mut entry) = registry.get_mut(&channel_name) {
                entry.retain(|(listener_id, _)| *listener_id != id);
                let now_empty = entry.is_empty();
                drop(entry);
                if now_empty {
                    registry.remove_if(&channel_name, |_, listeners| listeners.is_empty());
                }
            }
            debug!(channel = %channel_name, id, "Listener removed");
        })
    }
}
