//! Field deserializers that never reject a record over a field's shape.
//!
//! Null or wrongly typed values fall back to the field's default. Identifiers
//! may arrive as strings or numbers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?))
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_number(deserializer)?.unwrap_or_default())
}

pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|v| v.is_finite()))
}

pub fn opt_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().filter(|v| v.fract() == 0.0).map(|v| v as i64)))
}

pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_integer(deserializer)?.and_then(|v| u32::try_from(v).ok()))
}

pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        _ => return Ok(Vec::new()),
    };
    Ok(values.into_iter().filter_map(text).collect())
}

/// Keeps the elements of a list that parse, drops the rest
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = match Value::deserialize(deserializer)? {
        Value::Array(values) => values,
        _ => return Ok(Vec::new()),
    };
    Ok(values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Debug, Default)]
    struct Row {
        #[serde(default, deserialize_with = "string")]
        state: String,
        #[serde(default, deserialize_with = "opt_string")]
        tract_id: Option<String>,
        #[serde(default, deserialize_with = "number")]
        lat: f64,
        #[serde(default, deserialize_with = "opt_count")]
        tract_count: Option<u32>,
        #[serde(default, deserialize_with = "strings")]
        tracts: Vec<String>,
    }

    #[test]
    fn test_nulls_fall_back_to_defaults() {
        let row: Row = serde_json::from_value(json!({
            "state": null, "tract_id": null, "lat": null, "tract_count": null, "tracts": null
        }))
        .unwrap();

        assert_eq!(row.state, "");
        assert_eq!(row.tract_id, None);
        assert_eq!(row.lat, 0.0);
        assert_eq!(row.tract_count, None);
        assert!(row.tracts.is_empty());
    }

    #[test]
    fn test_numeric_identifiers_become_text() {
        let row: Row = serde_json::from_value(json!({
            "state": "IL", "tract_id": 17031840200u64, "lat": "41.8", "tract_count": 3.0, "tracts": [8140, "8141.02", null]
        }))
        .unwrap();

        assert_eq!(row.tract_id.as_deref(), Some("17031840200"));
        assert_eq!(row.lat, 0.0);
        assert_eq!(row.tract_count, Some(3));
        assert_eq!(row.tracts, vec!["8140".to_string(), "8141.02".to_string()]);
    }
}
