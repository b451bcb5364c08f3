//! Polars `AnyValue` conversion helpers.
//!
//! Every converter is null-preserving: a `Null` input, an unparseable string,
//! or a value of an unconvertible type yields `None` rather than an error.
//! Row-level validation happens later, against the whole coerced record.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::{AnyValue, TimeUnit};

/// Timestamp layouts observed across trip-record extract vintages.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
];

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an AnyValue to i64, returning None for non-integer or null values.
/// Floats truncate; extracts routinely carry counts as `1.0`.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Float32(v) => Some(v as i64),
        AnyValue::Float64(v) => Some(v as i64),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

/// Converts an AnyValue to a trimmed, non-empty string.
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    let text = match value {
        AnyValue::Null => return None,
        AnyValue::String(s) => s.trim().to_string(),
        AnyValue::StringOwned(s) => s.trim().to_string(),
        AnyValue::Boolean(b) => if b { "Y" } else { "N" }.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Converts an AnyValue to a naive timestamp. Native frame datetimes pass
/// through by time unit; strings are tried against the known format list.
pub fn any_to_datetime(value: AnyValue<'_>) -> Option<NaiveDateTime> {
    match value {
        AnyValue::Null => None,
        AnyValue::Datetime(raw, unit, _) => epoch_to_naive(raw, unit),
        AnyValue::DatetimeOwned(raw, unit, _) => epoch_to_naive(raw, unit),
        AnyValue::Date(days) => epoch_to_naive(i64::from(days) * 86_400_000, TimeUnit::Milliseconds),
        AnyValue::String(s) => parse_datetime(s),
        AnyValue::StringOwned(s) => parse_datetime(&s),
        _ => None,
    }
}

fn epoch_to_naive(raw: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let (secs, nanos) = match unit {
        TimeUnit::Nanoseconds => (raw.div_euclid(1_000_000_000), raw.rem_euclid(1_000_000_000)),
        TimeUnit::Microseconds => (raw.div_euclid(1_000_000), raw.rem_euclid(1_000_000) * 1_000),
        TimeUnit::Milliseconds => (raw.div_euclid(1_000), raw.rem_euclid(1_000) * 1_000_000),
    };
    DateTime::from_timestamp(secs, nanos as u32).map(|dt| dt.naive_utc())
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<f64>().ok()
}

/// Parses a string as i64, returning None for invalid or empty strings.
/// Falls back through f64 so `"2.0"` style values still truncate cleanly.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|v| v as i64))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn floats_widen_and_strings_parse() {
        assert_eq!(any_to_f64(AnyValue::Float32(2.5)), Some(2.5));
        assert_eq!(any_to_f64(AnyValue::Int64(3)), Some(3.0));
        assert_eq!(any_to_f64(AnyValue::String("14.50")), Some(14.5));
        assert_eq!(any_to_f64(AnyValue::String("n/a")), None);
        assert_eq!(any_to_f64(AnyValue::Null), None);
    }

    #[test]
    fn integers_preserve_null_and_truncate_floats() {
        assert_eq!(any_to_i64(AnyValue::Null), None);
        assert_eq!(any_to_i64(AnyValue::Float64(1.0)), Some(1));
        assert_eq!(any_to_i64(AnyValue::Float64(2.9)), Some(2));
        assert_eq!(any_to_i64(AnyValue::String("2.0")), Some(2));
        assert_eq!(any_to_i64(AnyValue::String("abc")), None);
    }

    #[test]
    fn datetime_strings_follow_the_format_list() {
        let dt = parse_datetime("2024-03-01 08:30:00").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2024, 3, 1));
        assert_eq!((dt.hour(), dt.minute()), (8, 30));

        assert!(parse_datetime("2024-03-01T08:30:00").is_some());
        assert!(parse_datetime("03/01/2024 08:30:00").is_some());
        assert!(parse_datetime("03/01/2024 08:30:00 AM").is_some());
        assert!(parse_datetime("yesterday").is_none());
        assert!(parse_datetime("").is_none());
    }

    #[test]
    fn native_datetimes_convert_by_unit() {
        let micros = 1_709_281_800_000_000i64; // 2024-03-01 08:30:00 UTC
        let from_micros = epoch_to_naive(micros, TimeUnit::Microseconds).unwrap();
        let from_millis = epoch_to_naive(micros / 1_000, TimeUnit::Milliseconds).unwrap();
        let from_nanos = epoch_to_naive(micros * 1_000, TimeUnit::Nanoseconds).unwrap();
        assert_eq!(from_micros, from_millis);
        assert_eq!(from_micros, from_nanos);
        assert_eq!(from_micros.hour(), 8);
    }

    #[test]
    fn text_trims_and_drops_empty() {
        assert_eq!(any_to_text(AnyValue::String("  N ")), Some("N".to_string()));
        assert_eq!(any_to_text(AnyValue::String("   ")), None);
        assert_eq!(any_to_text(AnyValue::Boolean(true)), Some("Y".to_string()));
        assert_eq!(any_to_text(AnyValue::Null), None);
    }
}
