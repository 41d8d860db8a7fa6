//! # Response Envelope
//!
//! Replies arrive in one of two wire protocols, distinguished after parsing
//! by the presence of an `errors` key:
//!
//! - **Current**: `{"errors": [...], "result": <value>?}` — `result`, when
//!   present, settles the call successfully even if `errors` is non-empty.
//!   Without `result`, `errors` enumerates the failure (or a placeholder
//!   when empty).
//! - **Legacy**: the bare result value itself.
//!
//! A legacy payload that happens to be an object with an `errors` key cannot
//! be told apart from the current protocol; the key is the wire-level
//! discriminant.

use crate::error::CallError;
use crate::value::WireValue;

/// Placeholder message when the backend reports failure with no reasons.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A parsed reply, classified by wire protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    /// Current protocol: `{errors, result?}`.
    Envelope {
        /// Backend-reported failure reasons, in order.
        errors: Vec<String>,
        /// The call result; `Some` wins over any `errors` content.
        result: Option<WireValue>,
    },
    /// Legacy protocol: the whole value is the result.
    Legacy(WireValue),
}

impl ResponsePayload {
    /// Classify a parsed reply.
    ///
    /// An object carrying an `errors` key is the current protocol;
    /// everything else is a legacy bare value.
    #[must_use]
    pub fn classify(value: WireValue) -> Self {
        match value {
            WireValue::Object(mut map) if map.contains_key("errors") => {
                let errors = match map.remove("errors") {
                    Some(WireValue::Array(items)) => {
                        items.into_iter().map(error_text).collect()
                    }
                    Some(WireValue::Null) | None => Vec::new(),
                    Some(other) => vec![error_text(other)],
                };
                let result = map.remove("result");
                Self::Envelope { errors, result }
            }
            other => Self::Legacy(other),
        }
    }

    /// Fold the reply into the call outcome.
    ///
    /// Invariant: a present `result` settles the call successfully even when
    /// `errors` is non-empty.
    pub fn settle(self) -> Result<WireValue, CallError> {
        match self {
            Self::Envelope {
                result: Some(result),
                ..
            } => Ok(result),
            Self::Envelope {
                errors,
                result: None,
            } => {
                if errors.is_empty() {
                    Err(CallError::Failed(vec![UNKNOWN_ERROR.to_owned()]))
                } else {
                    Err(CallError::Failed(errors))
                }
            }
            Self::Legacy(value) => Ok(value),
        }
    }
}

/// Render an `errors` entry to text. Revival may have turned a date-shaped
/// message into a timestamp, so non-strings fall back to their JSON form.
fn error_text(value: WireValue) -> String {
    match value {
        WireValue::String(s) => s,
        other => serde_json::to_string(&other).unwrap_or_default(),
    }
}
