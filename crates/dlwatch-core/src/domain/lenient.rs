//! Lenient decoding helpers for loosely-typed backend payloads.
//!
//! The backend is not strict about JSON types: booleans arrive as `null`,
//! progress arrives as a formatted string, and so on. These helpers accept
//! what the backend actually sends and define what "falsy" means for the
//! field-sync step of the merger.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::download::{Container, DownloadStep};

/// Truthiness of a JSON value as the backend's clients understand it.
///
/// `null`, `false`, `0` and `""` are falsy; everything else (including
/// empty arrays and objects) is truthy.
#[allow(clippy::float_cmp)]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Keep a number only if it is non-zero.
#[allow(clippy::float_cmp)]
pub(crate) fn truthy_number(value: Option<f64>) -> Option<f64> {
    value.filter(|n| *n != 0.0)
}

/// Keep a string only if it is non-empty.
pub(crate) fn truthy_text(value: Option<&String>) -> Option<String> {
    value.filter(|text| !text.is_empty()).cloned()
}

/// Decode a flag that may be `null`, missing, a bool or a number.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .is_some_and(is_truthy))
}

/// Decode a number that may be `null`, a JSON number or a numeric string.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => Ok(number.as_f64()),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, got \"{text}\"")))
        }
        Some(other) => Err(D::Error::custom(format!("expected a number, got {other}"))),
    }
}

/// Decode a step index from any non-negative integer or integer string.
///
/// Anything else reads as an unset step rather than failing the record.
pub(crate) fn step<'de, D>(deserializer: D) -> Result<Option<DownloadStep>, D::Error>
where
    D: Deserializer<'de>,
{
    let index = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(index.map(DownloadStep::from))
}

/// Decode a container object; `""`, `false` and other non-objects are absent.
pub(crate) fn container<'de, D>(deserializer: D) -> Result<Option<Container>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        _ => Ok(None),
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) const fn is_false(value: &bool) -> bool {
    !*value
}
