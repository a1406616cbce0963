//! Small helpers over loosely typed record values.

use serde_json::{Map, Value, json};

use entities_model::EncodedValue;

/// Whether an optional field counts as provided.
///
/// `null`, `false`, zero, and the empty string count as absent; sequences
/// and mappings always count as provided, even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The field's text when it is a non-empty string.
pub(crate) fn truthy_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

pub(crate) fn field_is_truthy(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(is_truthy)
}

/// Removes each listed field that is missing or falsy.
pub(crate) fn prune_falsy(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        if !field_is_truthy(map, key) {
            map.shift_remove(*key);
        }
    }
}

/// Key/value pair as it appears in the output.
pub(crate) fn encoded(value: EncodedValue) -> Value {
    json!({"key": value.key, "value": value.value})
}

/// Short description of a value's type for messages.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_optional_field_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!(2)));
    }

    #[test]
    fn prunes_only_falsy_fields() {
        let mut map = json!({"tel": "", "fax": null, "url": "https://example.com", "other": ""})
            .as_object()
            .cloned()
            .expect("object");
        prune_falsy(&mut map, &["tel", "fax", "url", "missing"]);
        assert_eq!(
            Value::Object(map),
            json!({"url": "https://example.com", "other": ""})
        );
    }
}
