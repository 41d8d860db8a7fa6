//! # Bridge Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `call_timeout` must be positive when set.
    #[error("call_timeout cannot be zero")]
    ZeroTimeout,
}

/// Call dispatcher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Optional deadline for a call's reply.
    ///
    /// `None` waits indefinitely: a call that never receives a response
    /// leaves its listener registered until the bridge is dropped. When set,
    /// expiry unregisters the listener and the call fails with a timeout.
    pub call_timeout: Option<Duration>,
}

impl BridgeConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(timeout) = self.call_timeout {
            if timeout.is_zero() {
                return Err(ConfigError::ZeroTimeout);
            }
        }
        Ok(())
    }
}
