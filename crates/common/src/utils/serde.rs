//! Serialization utilities for backend timestamps
//!
//! Field-level serde modules shared by wire models. Decoding is strict and
//! expects the backend's `yyyy-MM-dd HH:mm:ss` (UTC+8) strings; encoding
//! writes ISO-8601 / RFC 3339 in UTC, which is what the backend accepts in
//! request bodies.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::time::wire_date as wire_format;

/// Serde serialization result type
type SerializeResult<S> = Result<<S as Serializer>::Ok, <S as Serializer>::Error>;

fn to_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Custom serde module for a required backend timestamp.
///
/// # Usage
/// ```rust
/// use beautywiki_common::utils::wire_date;
/// use chrono::{DateTime, Utc};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Example {
///     #[serde(with = "wire_date")]
///     created_at: DateTime<Utc>,
/// }
/// ```
pub mod wire_date {
    use super::{
        to_iso8601, wire_format, DateTime, Deserialize, Deserializer, SerializeResult,
        Serializer, Utc,
    };
    use serde::de::Error as _;

    /// Serialize as ISO-8601 in UTC
    pub fn serialize<S>(instant: &DateTime<Utc>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_iso8601(instant))
    }

    /// Deserialize a `yyyy-MM-dd HH:mm:ss` UTC+8 string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        wire_format::parse(&raw).map_err(D::Error::custom)
    }
}

/// Custom serde module for an optional backend timestamp.
///
/// `null` and a missing field (with `#[serde(default)]`) both decode to
/// `None`; a present but malformed string is still an error.
pub mod wire_date_option {
    use super::{
        to_iso8601, wire_format, DateTime, Deserialize, Deserializer, SerializeResult,
        Serializer, Utc,
    };
    use serde::de::Error as _;

    /// Serialize as ISO-8601 in UTC, or `null`
    pub fn serialize<S>(instant: &Option<DateTime<Utc>>, serializer: S) -> SerializeResult<S>
    where
        S: Serializer,
    {
        match instant {
            Some(value) => serializer.serialize_some(&to_iso8601(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional `yyyy-MM-dd HH:mm:ss` UTC+8 string
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| wire_format::parse(&raw).map_err(D::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for timestamp serde helpers

    use chrono::TimeZone;
    use serde::{Deserialize, Serialize};

    use super::*;
    use crate::utils::{wire_date as wire_date_serde, wire_date_option};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Stamped {
        #[serde(with = "wire_date_serde")]
        created_at: DateTime<Utc>,
        #[serde(with = "wire_date_option", default)]
        updated_at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_deserialize_backend_format() {
        let json = r#"{"created_at":"2025-06-01 12:00:00","updated_at":null}"#;
        let stamped: Stamped = serde_json::from_str(json).expect("valid timestamp");
        assert_eq!(stamped.created_at, Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap());
        assert_eq!(stamped.updated_at, None);
    }

    #[test]
    fn test_missing_optional_timestamp_defaults_to_none() {
        let json = r#"{"created_at":"2025-06-01 12:00:00"}"#;
        let stamped: Stamped = serde_json::from_str(json).expect("valid timestamp");
        assert!(stamped.updated_at.is_none());
    }

    #[test]
    fn test_malformed_timestamp_is_an_error() {
        let json = r#"{"created_at":"2025-13-40 99:99:99"}"#;
        let err = serde_json::from_str::<Stamped>(json).unwrap_err();
        assert!(err.to_string().contains("2025-13-40 99:99:99"));

        let json = r#"{"created_at":"2025-06-01 12:00:00","updated_at":"yesterday"}"#;
        assert!(serde_json::from_str::<Stamped>(json).is_err());
    }

    #[test]
    fn test_serialize_writes_iso8601_utc() {
        let stamped = Stamped {
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 4, 0, 0).unwrap(),
            updated_at: None,
        };
        let json = serde_json::to_value(&stamped).expect("serializable");
        assert_eq!(json["created_at"], "2025-06-01T04:00:00Z");
        assert!(json["updated_at"].is_null());
    }
}
