//! Payload validators handed to the gateway resolver.
//!
//! A payload that fails its validator counts as a Tier-2 failure, so a
//! gateway serving an error page or a truncated document is skipped rather
//! than materialized.

use serde_json::Value;

/// Root metadata must carry a non-empty string `label`.
pub fn metadata_check(value: &Value) -> Result<(), String> {
    match value.get("label") {
        Some(Value::String(label)) if !label.trim().is_empty() => Ok(()),
        Some(Value::String(_)) => Err("label is empty".into()),
        Some(_) => Err("label is not a string".into()),
        None => Err("label is missing".into()),
    }
}

/// A relationship object must carry a `to` link with a string target.
pub fn relationship_check(value: &Value) -> Result<(), String> {
    match value.get("to").and_then(|to| to.get("/")) {
        Some(Value::String(_)) => Ok(()),
        Some(_) => Err("to link target is not a string".into()),
        None => Err("to link is missing".into()),
    }
}

/// Leaf documents only need to be JSON objects.
pub fn object_check(value: &Value) -> Result<(), String> {
    if value.is_object() {
        Ok(())
    } else {
        Err("document is not a JSON object".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_requires_non_empty_label() {
        assert!(metadata_check(&json!({ "label": "County" })).is_ok());
        assert!(metadata_check(&json!({ "label": "Seed", "relationships": {} })).is_ok());
        assert_eq!(metadata_check(&json!({ "label": " " })), Err("label is empty".into()));
        assert_eq!(metadata_check(&json!({ "label": 7 })), Err("label is not a string".into()));
        assert_eq!(metadata_check(&json!({})), Err("label is missing".into()));
        assert!(metadata_check(&json!(["County"])).is_err());
    }

    #[test]
    fn relationship_requires_to_link() {
        assert!(relationship_check(&json!({ "to": { "/": "bafy" } })).is_ok());
        assert!(relationship_check(&json!({ "from": { "/": "a" }, "to": { "/": "b" } })).is_ok());
        assert!(relationship_check(&json!({ "from": { "/": "a" } })).is_err());
        assert!(relationship_check(&json!({ "to": { "/": 1 } })).is_err());
        assert!(relationship_check(&json!({ "to": "bafy" })).is_err());
    }

    #[test]
    fn leaf_must_be_object() {
        assert!(object_check(&json!({})).is_ok());
        assert!(object_check(&json!([])).is_err());
        assert!(object_check(&json!("text")).is_err());
    }
}
