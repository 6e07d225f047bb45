// file: src/models/lenient.rs
// description: serde helpers for engine attributes that arrive as numbers or strings
// reference: https://serde.rs/field-attrs.html#deserialize_with

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

pub(crate) fn u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => number_to_u64(&n)
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected unsigned integer, got {}",
            other
        ))),
    }
}

pub(crate) fn opt_u64_from_any<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => number_to_u64(&n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected unsigned integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse().map(Some).map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected unsigned integer, got {}",
            other
        ))),
    }
}

pub(crate) fn i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| D::Error::custom(format!("expected integer, got {}", n))),
        Value::String(s) if s.trim().is_empty() => Ok(0),
        Value::String(s) => s.trim().parse().map_err(D::Error::custom),
        other => Err(D::Error::custom(format!("expected integer, got {}", other))),
    }
}

pub(crate) fn string_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!("expected string, got {}", other))),
    }
}

fn number_to_u64(n: &Number) -> Option<u64> {
    n.as_u64()
        .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
}
