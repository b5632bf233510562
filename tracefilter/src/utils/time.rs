//! Time utility functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Normalise a timestamp string to RFC 3339 UTC.
///
/// Values with an offset are converted directly. Values without one
/// (`2024-01-15T10:30:00`, `2024-01-15`) are read as local time in `tz`.
/// Returns `None` when the string is not a recognisable timestamp or the
/// local time does not exist in `tz`.
pub fn normalize_to_utc(value: &str, tz: Tz) -> Option<String> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(format_utc(dt.with_timezone(&Utc)));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => Some(format_utc(local.with_timezone(&Utc))),
        None => {
            tracing::debug!(value, tz = %tz, "Local time does not exist in timezone");
            None
        }
    }
}

fn format_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
