//! Instant parsing and rendering.
//!
//! Clients send anchors as ISO-8601 strings. Full RFC 3339 timestamps are
//! preferred; a date-time without an offset, or a bare date, is read as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Timelike, Utc};

/// Parse an ISO-8601 instant.
///
/// # Examples
///
/// ```
/// use lc_server::domain::parse_instant;
///
/// assert!(parse_instant("2022-09-09T09:09:09.000Z").is_ok());
/// assert!(parse_instant("2022-09-09T11:09:09+02:00").is_ok());
/// assert!(parse_instant("2022-09-09T09:09:09").is_ok());
/// assert!(parse_instant("2022-09-09").is_ok());
/// assert!(parse_instant("yesterday").is_err());
/// ```
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let s = s.trim();
    let rfc3339 = match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc)),
        Err(e) => e,
    };

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }

    Err(rfc3339)
}

/// Drop the sub-second component of an instant.
///
/// Truncates toward zero for instants after the epoch, which are the only
/// ones the identifier codec can represent.
pub fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.with_nanosecond(0).unwrap_or(instant)
}

/// Render an instant as RFC 3339 in UTC (`Z` suffix).
///
/// Fractional seconds are printed only when present, so rendering and
/// re-parsing is lossless.
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
