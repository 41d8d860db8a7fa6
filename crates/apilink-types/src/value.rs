//! # Value Codec
//!
//! The JSON value model carried over the bridge, plus **revival**: while a
//! reply is parsed, every string that is a complete, strict RFC 3339
//! date-time becomes a native [`WireValue::Timestamp`]. Anything short of a
//! full match (`"2023-05-01 leftover"`, a bare date) stays a plain string.
//!
//! Revival runs inside the serde visitor, so it applies bottom-up to every
//! scalar in the structure as parsing proceeds.
//!
//! Arguments travel as a list of *independently* JSON-encoded texts, never
//! as one JSON-encoded list: each argument controls its own encoding,
//! including the timestamp text form.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Number;
use std::collections::BTreeMap;
use std::fmt;

/// A JSON value with one richer scalar: revived timestamps.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number.
    Number(Number),
    /// JSON string that did not revive.
    String(String),
    /// A string that parsed as a complete RFC 3339 date-time.
    Timestamp(DateTime<FixedOffset>),
    /// JSON array.
    Array(Vec<WireValue>),
    /// JSON object.
    Object(BTreeMap<String, WireValue>),
}

impl WireValue {
    /// Revive a single string: a full strict RFC 3339 match becomes a
    /// timestamp, everything else stays a string.
    #[must_use]
    pub fn revive_str(s: &str) -> Self {
        match DateTime::parse_from_rfc3339(s) {
            Ok(ts) => Self::Timestamp(ts),
            Err(_) => Self::String(s.to_owned()),
        }
    }

    /// The string content, when this is an unrevived string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The object map, when this is an object.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, WireValue>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key, when this is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl From<bool> for WireValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        Self::Number(v.into())
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<WireValue>> for WireValue {
    fn from(v: Vec<WireValue>) -> Self {
        Self::Array(v)
    }
}

impl From<BTreeMap<String, WireValue>> for WireValue {
    fn from(v: BTreeMap<String, WireValue>) -> Self {
        Self::Object(v)
    }
}

impl Serialize for WireValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct WireValueVisitor;

        impl<'de> Visitor<'de> for WireValueVisitor {
            type Value = WireValue;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("any JSON value")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::Null)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::Null)
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::Bool(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::Number(v.into()))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::Number(v.into()))
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                // JSON has no non-finite numbers; map them to null like
                // serde_json's lossy float handling.
                Ok(Number::from_f64(v).map_or(WireValue::Null, WireValue::Number))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::revive_str(v))
            }

            fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(WireValue::revive_str(&v))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(WireValue::Array(items))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = BTreeMap::new();
                while let Some((key, value)) = access.next_entry::<String, WireValue>()? {
                    map.insert(key, value);
                }
                Ok(WireValue::Object(map))
            }
        }

        deserializer.deserialize_any(WireValueVisitor)
    }
}

/// Encode each argument to its own JSON text.
///
/// The result is a list of JSON texts, one per argument, not one JSON text
/// encoding a list.
pub fn encode_args(args: &[WireValue]) -> Result<Vec<String>, serde_json::Error> {
    args.iter().map(serde_json::to_string).collect()
}

/// Parse one JSON text, reviving strict RFC 3339 strings to timestamps.
pub fn decode_payload(payload: &str) -> Result<WireValue, serde_json::Error> {
    serde_json::from_str(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_round_trip_plain_value() {
        let text = r#"{"active":true,"count":42,"name":"alice","tags":["a","b"],"extra":null}"#;
        let value = decode_payload(text).unwrap();
        let encoded = serde_json::to_string(&value).unwrap();
        assert_eq!(decode_payload(&encoded).unwrap(), value);
    }

    #[test]
    fn test_revives_strict_date_time() {
        let value = decode_payload(r#""2023-05-01T12:00:00Z""#).unwrap();
        assert_eq!(value, WireValue::Timestamp(parse_ts("2023-05-01T12:00:00Z")));
    }

    #[test]
    fn test_partial_match_stays_string() {
        let value = decode_payload(r#""2023-05-01 leftover""#).unwrap();
        assert_eq!(value, WireValue::String("2023-05-01 leftover".into()));
    }

    #[test]
    fn test_bare_date_stays_string() {
        let value = decode_payload(r#""2023-05-01""#).unwrap();
        assert_eq!(value, WireValue::String("2023-05-01".into()));
    }

    #[test]
    fn test_missing_offset_stays_string() {
        let value = decode_payload(r#""2023-05-01T12:00:00""#).unwrap();
        assert_eq!(value, WireValue::String("2023-05-01T12:00:00".into()));
    }

    #[test]
    fn test_revival_is_recursive() {
        let value =
            decode_payload(r#"{"at":"2023-05-01T12:00:00Z","items":["2024-01-02T03:04:05+02:00","x"]}"#)
                .unwrap();
        assert_eq!(
            value.get("at"),
            Some(&WireValue::Timestamp(parse_ts("2023-05-01T12:00:00Z")))
        );
        let WireValue::Array(items) = value.get("items").unwrap() else {
            panic!("expected array");
        };
        assert_eq!(
            items[0],
            WireValue::Timestamp(parse_ts("2024-01-02T03:04:05+02:00"))
        );
        assert_eq!(items[1], WireValue::String("x".into()));
    }

    #[test]
    fn test_timestamp_serializes_as_rfc3339() {
        let value = WireValue::Timestamp(parse_ts("2023-05-01T12:00:00Z"));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#""2023-05-01T12:00:00Z""#
        );
    }

    #[test]
    fn test_args_encode_independently() {
        let args = vec![
            WireValue::from(1_i64),
            WireValue::from("a"),
            WireValue::Array(vec![WireValue::Null]),
        ];
        let encoded = encode_args(&args).unwrap();
        assert_eq!(encoded, vec!["1".to_owned(), r#""a""#.to_owned(), "[null]".to_owned()]);
    }

    #[test]
    fn test_encode_no_args() {
        assert!(encode_args(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payload_rejected() {
        assert!(decode_payload("{not json").is_err());
    }
}
