//! Lenient reading of stored card timestamps.
//!
//! Writes always use RFC 3339. Reads also accept the `Date.toString()` text
//! older stores hold (`Fri Feb 13 2026 10:00:00 GMT+0000 (Coordinated
//! Universal Time)`) and a bare `YYYY-MM-DD`, read as midnight UTC.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

const DATE_STRING_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Parses one stored timestamp in any accepted form.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    // Drop the trailing "(zone name)"; the offset before it is authoritative.
    let without_zone_name = value.split(" (").next().unwrap_or(value);
    if let Ok(parsed) = DateTime::parse_from_str(without_zone_name, DATE_STRING_FORMAT) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// `deserialize_with` target for required timestamps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp `{raw}`")))
}

/// `deserialize_with` target for optional timestamps; `null` and `""` are `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("unrecognized timestamp `{raw}`"))),
    }
}
