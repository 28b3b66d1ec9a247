use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// en-GB long form: `18/10/2026, 14:03:05`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Rendered in place of a timestamp that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Accepted when the service sends a timestamp without an offset; read as
/// wall-clock time in the target zone.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Formats an RFC 3339 timestamp in the local time zone.
pub fn format_timestamp(raw: &str) -> String {
    format_timestamp_in(raw, &Local)
}

/// Formats an RFC 3339 timestamp in `tz`, or returns [`INVALID_DATE`].
pub fn format_timestamp_in<Tz>(
    raw: &str,
    tz: &Tz,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match parse_timestamp(raw, tz) {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn parse_timestamp<Tz: TimeZone>(
    raw: &str,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(tz));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .and_then(|naive| tz.from_local_datetime(&naive).earliest())
}
