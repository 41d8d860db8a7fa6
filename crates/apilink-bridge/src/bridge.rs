//! # Call Dispatcher
//!
//! Sends a serialized call on an endpoint's request channel, listens for
//! exactly one reply on the response channel, and settles the call from the
//! reply envelope.
//!
//! Replies are matched by channel name alone, not by a correlation ID: two
//! in-flight calls to the *same* endpoint can consume each other's replies.
//! Callers sequence calls per endpoint.

use crate::config::BridgeConfig;
use crate::transport::IpcTransport;
use apilink_types::{decode_payload, encode_args, CallError, ChannelPair, ResponsePayload, WireValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatches calls from the UI process over the messaging transport.
pub struct ApiBridge {
    transport: Arc<dyn IpcTransport>,
    config: BridgeConfig,
}

impl ApiBridge {
    /// Create a bridge over a transport with default configuration.
    pub fn new(transport: Arc<dyn IpcTransport>) -> Self {
        Self::with_config(transport, BridgeConfig::default())
    }

    /// Create a bridge with explicit configuration.
    pub fn with_config(transport: Arc<dyn IpcTransport>, config: BridgeConfig) -> Self {
        Self { transport, config }
    }

    /// Invoke a named remote operation and await its reply.
    ///
    /// Each argument is JSON-encoded independently and the list is sent on
    /// the endpoint's request channel. The first message on the response
    /// channel settles the call: an `{errors, result}` envelope resolves to
    /// its result (or rejects with the ordered error messages), a legacy
    /// bare value resolves as-is.
    pub async fn call(&self, endpoint: &str, args: &[WireValue]) -> Result<WireValue, CallError> {
        let channels = ChannelPair::data(endpoint);
        let payload = encode_args(args)?;

        // Listener first: a reply sent before the listener exists would be
        // lost.
        let mut subscription = self.transport.subscribe(&channels.response);
        self.transport.send(&channels.request, payload).await?;

        debug!(
            endpoint,
            channel = %channels.request,
            args = args.len(),
            "Dispatched call"
        );

        let message = match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, subscription.recv()).await {
                Ok(message) => message,
                Err(_) => {
                    // Unregister the listener before reporting expiry.
                    drop(subscription);
                    warn!(endpoint, timeout_ms = limit.as_millis() as u64, "Call timed out");
                    return Err(CallError::Timeout(limit));
                }
            },
            None => subscription.recv().await,
        };

        // One reply per call: dropping the subscription removes the
        // listener, so a later message on the channel cannot re-settle.
        drop(subscription);

        let message = message.ok_or(CallError::ChannelClosed)?;
        let raw = message.payload.first().ok_or(CallError::EmptyResponse)?;
        let reply = ResponsePayload::classify(decode_payload(raw)?);
        reply.settle()
    }

    /// Trigger the opening of a secondary UI surface by name.
    ///
    /// `params` defaults to an empty object. Blocks until the backend
    /// acknowledges receipt; no response payload is consumed.
    pub fn open_window(
        &self,
        endpoint: &str,
        params: Option<WireValue>,
    ) -> Result<(), CallError> {
        let channels = ChannelPair::window(endpoint);
        let params = params.unwrap_or_else(|| WireValue::Object(BTreeMap::new()));
        let payload = serde_json::to_string(&params)?;

        debug!(endpoint, channel = %channels.request, "Opening window");
        self.transport.send_sync(&channels.request, payload)?;
        Ok(())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTransport;
    use std::time::Duration;
    use tokio::time::timeout;

    /// Spawn a backend stub answering the next call to `endpoint` with the
    /// given raw JSON reply.
    fn respond_once(transport: &Arc<InMemoryTransport>, endpoint: &str, reply: &str) {
        let channels = ChannelPair::data(endpoint);
        let mut requests = transport.subscribe(&channels.request);
        let transport = Arc::clone(transport);
        let reply = reply.to_owned();
        tokio::spawn(async move {
            let _request = requests.recv().await.expect("request");
            transport
                .send(&channels.response, vec![reply])
                .await
                .expect("reply send");
        });
    }

    #[tokio::test]
    async fn test_call_resolves_envelope_result() {
        let transport = Arc::new(InMemoryTransport::new());
        respond_once(&transport, "get-count", r#"{"errors":[],"result":42}"#);

        let bridge = ApiBridge::new(transport);
        let result = bridge.call("get-count", &[]).await.unwrap();
        assert_eq!(result, WireValue::from(42_i64));
    }

    #[tokio::test]
    async fn test_call_rejects_with_backend_errors() {
        let transport = Arc::new(InMemoryTransport::new());
        respond_once(&transport, "save", r#"{"errors":["bad input"]}"#);

        let bridge = ApiBridge::new(transport);
        let err = bridge
            .call("save", &[WireValue::from("x")])
            .await
            .unwrap_err();
        assert_eq!(err.messages(), Some(&["bad input".to_owned()][..]));
    }

    #[tokio::test]
    async fn test_call_resolves_legacy_reply() {
        let transport = Arc::new(InMemoryTransport::new());
        respond_once(&transport, "ping", r#""ok""#);

        let bridge = ApiBridge::new(transport);
        let result = bridge.call("ping", &[]).await.unwrap();
        assert_eq!(result, WireValue::from("ok"));
    }

    #[tokio::test]
    async fn test_malformed_reply_is_decode_error() {
        let transport = Arc::new(InMemoryTransport::new());
        respond_once(&transport, "bad", "{not json");

        let bridge = ApiBridge::new(transport);
        let err = bridge.call("bad", &[]).await.unwrap_err();
        assert!(matches!(err, CallError::Decode(_)));
    }

    #[tokio::test]
    async fn test_listener_removed_after_settlement() {
        let transport = Arc::new(InMemoryTransport::new());
        respond_once(&transport, "once", r#"{"errors":[],"result":1}"#);

        let bridge = ApiBridge::new(Arc::clone(&transport) as Arc<dyn IpcTransport>);
        bridge.call("once", &[]).await.unwrap();

        assert_eq!(transport.listener_count("_api-once-response"), 0);
    }

    #[tokio::test]
    async fn test_timeout_cleans_up_listener() {
        let transport = Arc::new(InMemoryTransport::new());
        // Nobody answers on this endpoint.
        let config = BridgeConfig {
            call_timeout: Some(Duration::from_millis(20)),
        };

        let bridge =
            ApiBridge::with_config(Arc::clone(&transport) as Arc<dyn IpcTransport>, config);
        let err = bridge.call("silent", &[]).await.unwrap_err();

        assert!(matches!(err, CallError::Timeout(_)));
        assert_eq!(transport.listener_count("_api-silent-response"), 0);
    }

    #[tokio::test]
    async fn test_open_window_sends_default_params() {
        let transport = Arc::new(InMemoryTransport::new());
        let mut requests = transport.subscribe("_open-settings-request");

        let bridge = ApiBridge::new(Arc::clone(&transport) as Arc<dyn IpcTransport>);
        bridge.open_window("settings", None).unwrap();

        let message = timeout(Duration::from_millis(100), requests.recv())
            .await
            .expect("timeout")
            .expect("request");
        assert_eq!(message.payload, vec!["{}".to_owned()]);
    }

    #[tokio::test]
    async fn test_open_window_sends_given_params() {
        let transport = Arc::new(InMemoryTransport::new());
        let mut requests = transport.subscribe("_open-editor-request");

        let bridge = ApiBridge::new(Arc::clone(&transport) as Arc<dyn IpcTransport>);
        let params = decode_payload(r#"{"file":"notes.txt"}"#).unwrap();
        bridge.open_window("editor", Some(params)).unwrap();

        let message = requests.recv().await.unwrap();
        assert_eq!(message.payload, vec![r#"{"file":"notes.txt"}"#.to_owned()]);
    }
}
