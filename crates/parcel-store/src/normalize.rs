//! Lenient field decoders for gateway payloads.
//!
//! Leaf documents are produced by many independent county scrapers and their
//! scalar types drift: years arrive as numbers or strings, booleans as
//! `"true"`, empty strings stand in for missing values. These decoders never
//! fail. A value that is missing, `null`, an empty string, or of an
//! unusable shape decodes to `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Optional text. Numbers and booleans are stringified.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?))
}

/// Text with `""` standing in for absent.
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional number. Numeric strings are parsed.
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(Value::deserialize(deserializer)?))
}

/// Optional boolean. `"true"` / `"false"` strings are accepted.
pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(boolean(Value::deserialize(deserializer)?))
}

/// Boolean defaulting to `false`.
pub fn bool_or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(boolean(Value::deserialize(deserializer)?).unwrap_or(false))
}

/// Integer defaulting to `0`. Fractional values are truncated.
pub fn integer_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let int = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => number(value).map(|f| f as i64),
    };
    Ok(int.unwrap_or(0))
}

/// Optional list of text values. A bare string becomes a one-element list.
pub fn opt_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let list = match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(text).collect()),
        other => text(other).map(|s| vec![s]),
    };
    Ok(list)
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn number(value: Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn boolean(value: Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "super::opt_string")]
        name: Option<String>,
        #[serde(deserialize_with = "super::opt_number")]
        area: Option<f64>,
        #[serde(deserialize_with = "super::opt_bool")]
        flag: Option<bool>,
        #[serde(deserialize_with = "super::bool_or_false")]
        finished: bool,
        #[serde(deserialize_with = "super::integer_or_zero")]
        index: i64,
        #[serde(deserialize_with = "super::opt_string_list")]
        tags: Option<Vec<String>>,
        #[serde(deserialize_with = "super::string_or_empty")]
        url: String,
    }

    fn decode(value: serde_json::Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_fields_are_absent() {
        let s = decode(json!({}));
        assert!(s.name.is_none());
        assert!(s.area.is_none());
        assert!(s.flag.is_none());
        assert!(!s.finished);
        assert_eq!(s.index, 0);
        assert!(s.tags.is_none());
        assert_eq!(s.url, "");
    }

    #[test]
    fn null_and_empty_string_are_absent() {
        let s = decode(json!({ "name": "", "area": null, "flag": "", "url": null }));
        assert!(s.name.is_none());
        assert!(s.area.is_none());
        assert!(s.flag.is_none());
        assert_eq!(s.url, "");
    }

    #[test]
    fn numbers_are_stringified_for_text_fields() {
        let s = decode(json!({ "name": 1987 }));
        assert_eq!(s.name.as_deref(), Some("1987"));
    }

    #[test]
    fn numeric_strings_parse() {
        let s = decode(json!({ "area": " 1250.5 ", "index": "3" }));
        assert_eq!(s.area, Some(1250.5));
        assert_eq!(s.index, 3);
    }

    #[test]
    fn wrong_shapes_are_absent_not_errors() {
        let s = decode(json!({ "name": { "nested": true }, "area": [1], "flag": 7 }));
        assert!(s.name.is_none());
        assert!(s.area.is_none());
        assert!(s.flag.is_none());
    }

    #[test]
    fn bool_strings_are_accepted() {
        let s = decode(json!({ "flag": "TRUE", "finished": "yes" }));
        assert_eq!(s.flag, Some(true));
        assert!(s.finished);
    }

    #[test]
    fn zero_and_false_are_preserved() {
        let s = decode(json!({ "area": 0, "flag": false }));
        assert_eq!(s.area, Some(0.0));
        assert_eq!(s.flag, Some(false));
    }

    #[test]
    fn lists_drop_empty_entries() {
        let s = decode(json!({ "tags": ["Thermostat", "", null, "Lighting"] }));
        assert_eq!(s.tags.unwrap(), vec!["Thermostat", "Lighting"]);
        let single = decode(json!({ "tags": "Doorbell" }));
        assert_eq!(single.tags.unwrap(), vec!["Doorbell"]);
    }
}
