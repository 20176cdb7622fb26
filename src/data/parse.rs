//! Cell-level parsing and formatting shared by CSV loading and coercion.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Tokens read as missing unless the configuration says otherwise.
pub const DEFAULT_NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Layout used for timestamps in CSV output and labels. Fractional seconds
/// are only written when present.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

/// Parses a timestamp in one of the recognised layouts. Offsets are
/// normalised to UTC and dropped; bare dates land on midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Milliseconds since the epoch, the physical value of a timestamp column.
pub fn to_millis(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

pub fn from_millis(ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
}

pub fn format_number(v: f64) -> String {
    format!("{v}")
}

/// Formats a timestamp; `date_only` drops the time of day.
pub fn format_timestamp(ts: &NaiveDateTime, date_only: bool) -> String {
    if date_only {
        ts.format(DATE_FORMAT).to_string()
    } else {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }
}

pub fn is_midnight(ts: &NaiveDateTime) -> bool {
    ts.time() == NaiveTime::MIN
}
