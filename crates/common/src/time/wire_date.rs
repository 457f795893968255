//! Backend wire date format
//!
//! The backend sends every timestamp (token expiry, article publication
//! dates, comment dates) as a zone-less `yyyy-MM-dd HH:mm:ss` string that is
//! implicitly Beijing time. Parsing is strict: a string that does not match
//! the format, or names an impossible date, is an error and never falls back
//! to "now".

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// `strftime` pattern of backend timestamps.
pub const WIRE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timezone the backend's zone-less timestamps are expressed in.
pub const WIRE_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// A backend timestamp could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date `{input}` (expected yyyy-MM-dd HH:mm:ss in Asia/Shanghai): {reason}")]
pub struct WireDateError {
    /// The offending input.
    pub input: String,
    /// Parser diagnostic.
    pub reason: String,
}

/// Parse a backend timestamp into UTC.
///
/// # Errors
/// Returns [`WireDateError`] when `input` does not match
/// [`WIRE_DATE_FORMAT`] or does not name a valid local time.
pub fn parse(input: &str) -> Result<DateTime<Utc>, WireDateError> {
    let naive = NaiveDateTime::parse_from_str(input, WIRE_DATE_FORMAT)
        .map_err(|e| WireDateError { input: input.to_string(), reason: e.to_string() })?;

    let local = WIRE_TIMEZONE.from_local_datetime(&naive).single().ok_or_else(|| {
        WireDateError {
            input: input.to_string(),
            reason: "ambiguous or non-existent local time".to_string(),
        }
    })?;

    Ok(local.with_timezone(&Utc))
}

/// Render a UTC instant in the backend's wire format.
#[must_use]
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&WIRE_TIMEZONE).format(WIRE_DATE_FORMAT).to_string()
}
