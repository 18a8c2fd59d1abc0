//! Column type inference over raw string cells.
//!
//! Inference runs once, at decode time, and the declared type it produces is
//! consulted (never re-derived) by every later operation. The pass is
//! strict: a column is only declared integer, float, or timestamp when every
//! non-null cell parses as that type, which guarantees typed cell parsing
//! cannot fail afterwards.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{ColumnType, Value};

/// Quick screen before attempting a full timestamp parse.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{2}/\d{2}/\d{4}").unwrap(), // US date
        Regex::new(r"^\d{2}-\d{2}-\d{4}").unwrap(), // European date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

/// Formats accepted for timestamp cells, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only formats, promoted to midnight timestamps.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Check if a raw cell represents a missing/null value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

/// Parse a timestamp from its string representation.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if !DATE_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed.and_time(NaiveTime::MIN));
        }
    }
    None
}

/// Infer the declared type for a column of raw cells.
///
/// Null tokens are ignored; a column with no non-null cells defaults to
/// string.
pub fn infer_column_type<S: AsRef<str>>(values: &[S]) -> ColumnType {
    let non_null: Vec<&str> = values
        .iter()
        .map(|v| v.as_ref().trim())
        .filter(|v| !is_null_token(v))
        .collect();

    if non_null.is_empty() {
        return ColumnType::String;
    }
    if non_null.iter().all(|v| v.parse::<i64>().is_ok()) {
        return ColumnType::Integer;
    }
    if non_null.iter().all(|v| v.parse::<f64>().is_ok()) {
        return ColumnType::Float;
    }
    if non_null.iter().all(|v| parse_timestamp(v).is_some()) {
        return ColumnType::Timestamp;
    }
    ColumnType::String
}

/// Parse one raw cell under a declared column type.
///
/// Null tokens become `Value::Null`. Returns `None` when the cell does not
/// parse as the declared type; under strict inference that only happens for
/// externally supplied (not inferred) types.
pub fn parse_cell(raw: &str, dtype: ColumnType) -> Option<Value> {
    if is_null_token(raw) {
        return Some(Value::Null);
    }
    let trimmed = raw.trim();
    match dtype {
        ColumnType::Integer => trimmed.parse::<i64>().ok().map(Value::Int),
        ColumnType::Float => trimmed.parse::<f64>().ok().map(Value::Float),
        ColumnType::Timestamp => parse_timestamp(trimmed).map(Value::Timestamp),
        ColumnType::String => Some(Value::Str(raw.to_string())),
    }
}
