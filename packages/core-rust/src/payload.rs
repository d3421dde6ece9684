//! Payload documents and their JSON text codec.
//!
//! Both inbound request bodies and outbound handler results are JSON objects.
//! `serde_json` is built with `preserve_order`, so keys keep document order
//! through a parse/serialize cycle.

use serde_json::{Map, Value};

use crate::error::{PayloadError, ValidationError};

/// A JSON object: string keys mapped to JSON values, in document order.
pub type Payload = Map<String, Value>;

/// Parses request body text into a payload document.
///
/// # Errors
///
/// Returns [`PayloadError::Syntax`] when the text is not valid JSON (including
/// an empty body) and [`PayloadError::NotAnObject`] when the top-level value
/// is an array, string, number, boolean or `null`.
pub fn parse_payload(text: &str) -> Result<Payload, PayloadError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(PayloadError::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

/// Serializes a payload document to compact JSON text.
#[must_use]
pub fn serialize_payload(payload: Payload) -> String {
    Value::Object(payload).to_string()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Field access by dotted path
// ---------------------------------------------------------------------------

/// Looks up a nested value by dotted path, e.g. `resource.refUpdates.0.name`.
///
/// Numeric segments index into arrays; every other segment selects an object
/// key. Returns `None` as soon as a segment cannot be followed.
#[must_use]
pub fn field<'a>(payload: &'a Payload, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = payload.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns a required, non-blank string field.
///
/// # Errors
///
/// [`ValidationError::MissingField`] when absent or `null`,
/// [`ValidationError::InvalidField`] when not a string or blank.
pub fn required_str<'a>(payload: &'a Payload, path: &str) -> Result<&'a str, ValidationError> {
    match field(payload, path) {
        None | Some(Value::Null) => Err(ValidationError::missing(path)),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
        Some(_) => Err(ValidationError::invalid(path, "a non-empty string")),
    }
}

/// Returns an optional string field; absent and `null` both yield `None`.
///
/// # Errors
///
/// [`ValidationError::InvalidField`] when present but not a string.
pub fn optional_str<'a>(
    payload: &'a Payload,
    path: &str,
) -> Result<Option<&'a str>, ValidationError> {
    match field(payload, path) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(ValidationError::invalid(path, "a string")),
    }
}

/// Returns a required integer field greater than zero.
///
/// # Errors
///
/// [`ValidationError::MissingField`] when absent or `null`,
/// [`ValidationError::InvalidField`] for anything but a positive integer.
pub fn required_positive_int(payload: &Payload, path: &str) -> Result<u64, ValidationError> {
    match field(payload, path) {
        None | Some(Value::Null) => Err(ValidationError::missing(path)),
        Some(Value::Number(n)) => n
            .as_u64()
            .filter(|n| *n > 0)
            .ok_or_else(|| ValidationError::invalid(path, "a positive integer")),
        Some(_) => Err(ValidationError::invalid(path, "a positive integer")),
    }
}

/// Returns an optional signed integer field.
///
/// # Errors
///
/// [`ValidationError::InvalidField`] when present but not an integer.
pub fn optional_int(payload: &Payload, path: &str) -> Result<Option<i64>, ValidationError> {
    match field(payload, path) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::invalid(path, "an integer")),
        Some(_) => Err(ValidationError::invalid(path, "an integer")),
    }
}
