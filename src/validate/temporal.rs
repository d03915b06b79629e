//! Instant parsing for temporal field validation
//!
//! Accepted shapes, tried in order for strings:
//! - RFC 3339 (`2024-02-29T10:30:00Z`, offsets allowed)
//! - naive datetime (`2024-02-29T10:30:00[.123]`, `2024-02-29T10:30`)
//! - date (`2024-02-29`)
//! - month (`2024-02`)
//! - ISO week (`2024-W09`)
//! - time of day (`10:30[:00]`), anchored to the epoch day
//!
//! Numeric values are interpreted as milliseconds since the Unix epoch.
//! Naive shapes are treated as UTC so comparisons stay deterministic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc, Weekday};
use serde_json::Value;

/// Parses a dynamic value into an instant, if it has a temporal shape.
pub(crate) fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => parse_instant_text(text),
        Value::Number(number) => {
            let millis = number.as_i64()?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

/// Parses temporal text (input values and schema date bounds).
pub(crate) fn parse_instant_text(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    if let Some(instant) = parse_month(text) {
        return Some(instant);
    }
    if let Some(instant) = parse_iso_week(text) {
        return Some(instant);
    }
    for layout in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(text, layout) {
            let epoch_day = NaiveDate::from_ymd_opt(1970, 1, 1)?;
            return Some(Utc.from_utc_datetime(&epoch_day.and_time(time)));
        }
    }
    None
}

/// `YYYY-MM` → first day of that month.
fn parse_month(text: &str) -> Option<DateTime<Utc>> {
    let (year, month) = text.split_once('-')?;
    if year.len() != 4 || month.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// `YYYY-Www` → Monday of that ISO week.
fn parse_iso_week(text: &str) -> Option<DateTime<Utc>> {
    let (year, week) = text.split_once("-W")?;
    let year: i32 = year.parse().ok()?;
    let week: u32 = week.parse().ok()?;
    let date = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}
