//! ISO-8601 timestamp helpers.
//!
//! Appointment times are stored as the strings callers supplied. They are only
//! parsed when a comparison or a derived default needs an instant.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a stored or user-supplied timestamp into an instant.
///
/// Accepted forms:
/// - RFC 3339 with offset (`2025-03-01T10:00:00Z`, `2025-03-01T10:00:00.5+02:00`)
/// - Date only (`2025-03-01`), read as midnight UTC
/// - Date-time without zone (`2025-03-01T10:00:00`, `2025-03-01T10:00`), read as UTC
///
/// Anything else yields `None`.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Render an instant the way stored timestamps look (`2025-03-01T10:00:00.000Z`).
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Render a derived instant with the shortest exact fractional part.
///
/// `2025-03-01T11:00:00Z` stays free of a `.000` suffix so derived values
/// line up with whole-second inputs.
pub fn format_derived(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
