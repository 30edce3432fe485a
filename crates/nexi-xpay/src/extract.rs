//! Loose, path-based extraction from decoded JSON bodies.
//!
//! Paths are `/`-separated object keys (`errore/codice`). "Loose" means
//! scalars are coerced: numbers and booleans read as strings, numeric strings
//! read as integers. Arrays and objects are never coerced.

use serde_json::{Map, Value};

use crate::error::{Result, XPayError};

/// Value at `path`, or `None` when any segment is absent or the value is null.
pub fn lookup<'a>(body: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('/');
    let first = segments.next()?;
    let mut current = body.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// String at `path`; `default` when absent.
pub fn string_or(body: &Map<String, Value>, path: &str, default: &str) -> Result<String> {
    match lookup(body, path) {
        None => Ok(default.to_string()),
        Some(value) => scalar_to_string(path, value),
    }
}

/// String at `path` that must be present and non-empty.
pub fn non_empty_string(body: &Map<String, Value>, path: &str) -> Result<String> {
    let value = string_or(body, path, "")?;
    if value.is_empty() {
        return Err(XPayError::MissingField(path.to_string()));
    }
    Ok(value)
}

/// String at `path`; `default` when absent or empty.
pub fn non_empty_string_or(body: &Map<String, Value>, path: &str, default: &str) -> Result<String> {
    let value = string_or(body, path, "")?;
    if value.is_empty() {
        return Ok(default.to_string());
    }
    Ok(value)
}

/// Integer at `path`; `default` when absent, empty or zero.
pub fn non_empty_int_or(body: &Map<String, Value>, path: &str, default: i64) -> Result<i64> {
    let parsed = match lookup(body, path) {
        None => return Ok(default),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(default),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(0) => Ok(default),
        Some(n) => Ok(n),
        None => Err(XPayError::UpstreamBodyMalformed(format!(
            "{path} is not an integer"
        ))),
    }
}

fn scalar_to_string(path: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(XPayError::UpstreamBodyMalformed(format!(
            "{path} is not a scalar"
        ))),
    }
}
