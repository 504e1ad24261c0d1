use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value as an instant.
///
/// Numbers are Unix seconds (fractional allowed, as in ChatGPT's `create_time`),
/// strings are RFC3339. Anything else yields `None`.
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let secs = n.as_f64()?;
            if !secs.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis((secs * 1000.0).round() as i64)
        }
        Value::String(s) => s.parse::<DateTime<Utc>>().ok(),
        _ => None,
    }
}

/// Custom deserializer for optional timestamps that accepts Unix seconds or RFC3339 strings
///
/// `null` maps to `None`; a present but unparseable value is an error so the
/// surrounding record is rejected rather than silently undated.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Number(_) | Value::String(_) => timestamp_from_value(&value)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("invalid timestamp: {}", value))),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/// Deserialize an optional string, treating empty strings as absent
pub fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
