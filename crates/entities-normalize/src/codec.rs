//! Sortable encodings for durations, times of day, and dates.
//!
//! Calendar-layout forms describe how much time one page covers
//! (`"3 weeks"`) and when the first row starts (`"9am"`). The display layer
//! filters and sorts on fixed-width numeric strings, so both are encoded
//! alongside the original text.
//!
//! A parsed value of zero is reported as a format error, exactly like a
//! string that does not match at all. The only way to express an empty
//! duration is the literal `variable`, and midnight must be spelled
//! `midnight` rather than `12am` or `0am`.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

use entities_model::EncodedValue;

/// Literal accepted as a zero-length page duration.
pub const VARIABLE_DURATION: &str = "variable";

/// Width of encoded duration keys, in digits.
pub const DURATION_KEY_WIDTH: usize = 4;

/// Width of encoded time keys, in digits.
pub const TIME_KEY_WIDTH: usize = 2;

/// Width of encoded date keys, in digits.
pub const DATE_KEY_WIDTH: usize = 15;

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+) (day|week|month)s?$").expect("valid duration regex")
});

static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([0-9]+) *([ap])m$").expect("valid time regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("could not convert '{0}' to duration")]
    Duration(String),
    #[error("could not convert '{0}' to time")]
    Time(String),
    #[error("could not convert '{0}' to date")]
    Date(String),
}

fn zero_pad(n: u64, width: usize) -> String {
    format!("{n:0width$}")
}

fn unit_days(unit: &str) -> u64 {
    match unit.to_ascii_lowercase().as_str() {
        "week" => 7,
        // Fixed approximation, not calendar-aware.
        "month" => 30,
        _ => 1,
    }
}

/// Parses a duration into a whole number of days.
pub fn duration_days(text: &str) -> Result<u64, FormatError> {
    if text == VARIABLE_DURATION {
        return Ok(0);
    }
    let error = || FormatError::Duration(text.to_string());
    let caps = DURATION.captures(text).ok_or_else(error)?;
    let count: u64 = caps[1].parse().map_err(|_| error())?;
    count
        .checked_mul(unit_days(&caps[2]))
        .filter(|days| *days > 0)
        .ok_or_else(error)
}

/// Encodes a duration as a zero-padded day count plus the original text.
///
/// `"3 weeks"` becomes `{key: "0021", value: "3 weeks"}`.
pub fn encode_duration(text: &str) -> Result<EncodedValue, FormatError> {
    let days = duration_days(text)?;
    Ok(EncodedValue::new(zero_pad(days, DURATION_KEY_WIDTH), text))
}

/// Encodes a time of day as a zero-padded hour.
///
/// `pm` adds twelve hours unconditionally, so `"12pm"` encodes as `"24"`.
pub fn encode_time(text: &str) -> Result<String, FormatError> {
    match text.to_lowercase().as_str() {
        "midnight" => return Ok("00".to_string()),
        "noon" => return Ok("12".to_string()),
        _ => {}
    }
    let error = || FormatError::Time(text.to_string());
    let caps = TIME_OF_DAY.captures(text).ok_or_else(error)?;
    let hour: u64 = caps[1].parse().map_err(|_| error())?;
    let offset = if caps[2].eq_ignore_ascii_case("p") { 12 } else { 0 };
    let hour = hour
        .checked_add(offset)
        .filter(|hour| *hour > 0)
        .ok_or_else(error)?;
    Ok(zero_pad(hour, TIME_KEY_WIDTH))
}

/// Encodes a time of day as a key/value pair.
pub fn encode_time_value(text: &str) -> Result<EncodedValue, FormatError> {
    Ok(EncodedValue::new(encode_time(text)?, text))
}

/// Encodes a calendar date as milliseconds since 1970-01-01 UTC (zero-padded
/// to fifteen digits) plus an ISO `YYYY-MM-DD` string.
///
/// Accepts plain dates and RFC 3339 timestamps. Dates before the epoch are
/// rejected because they cannot be zero-padded into a sortable key.
pub fn encode_date(text: &str) -> Result<EncodedValue, FormatError> {
    let trimmed = text.trim();
    let error = || FormatError::Date(text.to_string());
    let timestamp = if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        date.and_time(NaiveTime::MIN).and_utc()
    } else {
        DateTime::parse_from_rfc3339(trimmed)
            .map_err(|_| error())?
            .to_utc()
    };
    let millis = u64::try_from(timestamp.timestamp_millis()).map_err(|_| error())?;
    Ok(EncodedValue::new(
        zero_pad(millis, DATE_KEY_WIDTH),
        timestamp.format("%Y-%m-%d").to_string(),
    ))
}
