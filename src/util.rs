// Field normalizers and formatting helpers.
//
// Every "dirty" column of the export goes through one of the functions
// below, so the loader can assemble records from plain typed values. None
// of them fail: malformed input maps to `None` or to the documented default.
use chrono::{NaiveDate, TimeDelta};
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;

/// Day zero of the spreadsheet serial-date system used by the export.
///
/// This is 1899-12-30, not 1900-01-01: the two-day shift absorbs the
/// phantom 1900-02-29 of the original spreadsheet calendar.
pub static SERIAL_EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1899, 12, 30).expect("1899-12-30 is a valid date"));

/// Literal a missing technical location is coerced to.
pub const MISSING_LOCATION: &str = "nan";

/// Parse a loosely formatted number.
///
/// - Trims whitespace and rejects empty strings.
/// - Rejects anything containing letters (`"abc"`, `"nan"`, `"inf"`).
/// - Accepts both `1,234.5` and `1.234,5`: whichever separator comes last
///   is the decimal mark, the other one is a thousands separator.
pub fn parse_number(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let cleaned = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), None) if s.matches(',').count() == 1 => s.replace(',', "."),
        _ => s.replace(',', ""),
    };
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Organizational codes compare by integer value, so `"1000"`, `" 1000 "`
/// and `"1000.0"` all resolve to the same key.
pub fn parse_org_code(s: Option<&str>) -> Option<i64> {
    let s = s?.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let v = parse_number(Some(s))?;
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

pub fn normalize_location(s: Option<&str>) -> String {
    match s.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING_LOCATION.to_string(),
    }
}

/// Truncate a monetary value to whole units. Non-finite and negative
/// values collapse to zero.
pub fn cost_from_f64(v: f64) -> i64 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    v.trunc().min(i64::MAX as f64) as i64
}

/// Returns the whole-unit cost and whether the raw text had to be coerced.
pub fn parse_cost(s: Option<&str>) -> (i64, bool) {
    match parse_number(s) {
        Some(v) => (cost_from_f64(v), false),
        None => (0, true),
    }
}

/// Serial day offsets may carry a time-of-day fraction; only the day counts.
pub fn parse_serial(s: Option<&str>) -> Option<i64> {
    let v = parse_number(s)?;
    let day = v.floor();
    if day.abs() < i64::MAX as f64 {
        Some(day as i64)
    } else {
        None
    }
}

pub fn serial_to_date(serial: i64) -> Option<NaiveDate> {
    SERIAL_EPOCH.checked_add_signed(TimeDelta::try_days(serial)?)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
