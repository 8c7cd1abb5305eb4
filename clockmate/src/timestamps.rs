//! Wall-clock timestamp handling.
//!
//! Clock events and account creation times are stored as naive local datetimes with second
//! precision and exchanged as `YYYY-MM-DD HH:MM:SS` strings. Client-supplied timestamps are
//! normalized into that form with [`normalize_client_timestamp`].

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SubsecRound};

/// Canonical storage and wire format.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the `start`/`end` log filters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Naive datetime layouts tried, in order, for non-canonical client timestamps.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Current server time, truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Current server date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Server UTC offset, e.g. `+02:00`.
pub fn utc_offset() -> String {
    Local::now().format("%:z").to_string()
}

/// Format a datetime in the canonical `YYYY-MM-DD HH:MM:SS` form.
pub fn format(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Turn an optional client timestamp into the value to store.
///
/// Absent or blank input means "now". Canonical input is kept as-is. Anything else is parsed
/// as a common date-time representation (RFC 3339, RFC 2822, ISO 8601 without offset, bare
/// date) and reformatted, keeping the wall-clock time in whatever offset the client sent. Input
/// that cannot be parsed falls back to the current server time; a malformed timestamp never
/// fails the request.
pub fn normalize_client_timestamp(raw: Option<&str>) -> NaiveDateTime {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return now();
    };

    match parse_flexible(raw) {
        Some(parsed) => parsed.trunc_subsecs(0),
        None => {
            tracing::debug!("Unparseable client timestamp {:?}, using server time", raw);
            now()
        }
    }
}

fn parse_flexible(raw: &str) -> Option<NaiveDateTime> {
    if raw.len() == 19
        && let Ok(canonical) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
    {
        return Some(canonical);
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    if let Ok(with_offset) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(with_offset.naive_local());
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc2822(raw) {
        return Some(with_offset.naive_local());
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(naive);
        }
    }

    parse_date(raw).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Serde adapter for `NaiveDateTime` fields in the canonical format.
pub mod sql_datetime {
    use super::DATETIME_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(DATETIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
