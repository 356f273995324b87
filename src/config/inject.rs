//! Dotted key path injection.
//!
//! Writes a value at a path like `connections.0.host`, creating missing
//! intermediate containers. A missing container becomes an array when the
//! segment after it looks like an index, an object otherwise. Existing values
//! along the path are reused whatever their type.

use crate::error::KeyPathError;
use serde_json::{Map, Value};

/// Whether `segment` reads as an integer (`"0"`, `"12"`, `"-1"`, `"1e2"`,
/// `"0x1f"`).
///
/// An empty segment counts as `0`.
pub fn looks_like_index(segment: &str) -> bool {
    let trimmed = segment.trim();
    if trimmed.is_empty() || is_radix_literal(trimmed) {
        return true;
    }
    trimmed
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n.fract() == 0.0)
}

/// Unsigned `0x`/`0o`/`0b` literal with at least one digit.
fn is_radix_literal(s: &str) -> bool {
    let radix = match s.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return false,
    };
    let digits = &s[2..];
    !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix))
}

/// Canonical array index: `"3"` yes, `"03"`, `"+3"` or `"-1"` no.
fn array_index(segment: &str) -> Option<usize> {
    segment
        .parse::<usize>()
        .ok()
        .filter(|idx| idx.to_string() == segment)
}

fn new_container(as_array: bool) -> Value {
    if as_array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

/// Set `value` at the dotted `key_path` inside `root`.
pub fn set_value(root: &mut Value, key_path: &str, value: Value) -> Result<(), KeyPathError> {
    let segments: Vec<&str> = key_path.split('.').collect();

    let mut target = root;
    for pair in segments.windows(2) {
        target = descend(target, pair[0], looks_like_index(pair[1]), key_path)?;
    }

    let last = segments.last().copied().unwrap_or(key_path);
    assign(target, last, value, key_path)
}

fn descend<'a>(
    target: &'a mut Value,
    segment: &str,
    next_is_index: bool,
    key_path: &str,
) -> Result<&'a mut Value, KeyPathError> {
    match target {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| new_container(next_is_index))),
        Value::Array(items) => match array_index(segment) {
            Some(idx) if idx < items.len() => Ok(&mut items[idx]),
            // Missing array slots are appended, not placed at the index.
            _ => {
                items.push(new_container(next_is_index));
                let len = items.len();
                Ok(&mut items[len - 1])
            }
        },
        _ => Err(KeyPathError::NotAContainer {
            key_path: key_path.to_string(),
            segment: segment.to_string(),
        }),
    }
}

fn assign(target: &mut Value, key: &str, value: Value, key_path: &str) -> Result<(), KeyPathError> {
    match target {
        Value::Object(map) => {
            map.insert(key.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let idx = array_index(key).ok_or_else(|| KeyPathError::InvalidIndex {
                key_path: key_path.to_string(),
                segment: key.to_string(),
            })?;
            if idx >= items.len() {
                items.resize(idx + 1, Value::Null);
            }
            items[idx] = value;
            Ok(())
        }
        _ => Err(KeyPathError::NotAContainer {
            key_path: key_path.to_string(),
            segment: key.to_string(),
        }),
    }
}
