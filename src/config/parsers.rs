//! Ready-made environment value parsers for [`KeyOptions::with_parser`].
//!
//! Each parser returns `None` when the raw value cannot be converted, which
//! leaves the merged config value in place.
//!
//! [`KeyOptions::with_parser`]: super::KeyOptions::with_parser

use serde_json::{Number, Value};

/// Integer when the value is integral, float otherwise.
pub fn number(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if let Ok(int) = raw.parse::<i64>() {
        return Some(Value::from(int));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// `true`/`false`, also accepting `1`/`0`, `yes`/`no` and `on`/`off`.
pub fn boolean(raw: &str) -> Option<Value> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(Value::Bool(true)),
        "false" | "0" | "no" | "off" => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Any JSON document, e.g. `["a","b"]` or `{"port":1}`.
pub fn json(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// Comma separated list of trimmed strings; empty items are skipped.
pub fn list(raw: &str) -> Option<Value> {
    Some(Value::Array(
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect(),
    ))
}
