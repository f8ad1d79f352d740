//! Timestamp handling for SimRail feeds.
//!
//! The timetable feed sends ISO 8601 timestamps, sometimes with an offset
//! and sometimes without. Naive timestamps are interpreted as UTC.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Error returned when parsing an invalid timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Naive layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an upstream timestamp.
///
/// # Examples
///
/// ```
/// use delay_server::domain::parse_timestamp;
///
/// let with_offset = parse_timestamp("2024-01-01T11:00:00+01:00").unwrap();
/// let naive = parse_timestamp("2024-01-01 10:00:00").unwrap();
/// assert_eq!(with_offset, naive);
///
/// assert!(parse_timestamp("10:00").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::new("empty string"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TimeError::new("expected ISO 8601 date and time"))
}

/// Whole minutes from `reference` to `now`, rounded half away from zero.
///
/// Negative when `now` is before `reference`.
pub fn rounded_minutes_since(now: DateTime<Utc>, reference: DateTime<Utc>) -> i64 {
    let millis = now.signed_duration_since(reference).num_milliseconds();
    (millis as f64 / 60_000.0).round() as i64
}

/// Add whole minutes to a timestamp, saturating at the representable range.
pub fn add_minutes(t: DateTime<Utc>, minutes: u32) -> DateTime<Utc> {
    t.checked_add_signed(Duration::minutes(i64::from(minutes)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
