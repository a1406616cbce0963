//! Mapping key normalization.
//!
//! Source files are hand-written, so keys arrive as free text
//! (`"Booking Tel"`, `"start-page"`, `"Referral  Types"`). Every key in a
//! record, at any depth, is rewritten to a snake-case identifier before
//! any other processing looks at it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Normalizes a single key: whitespace runs become one underscore,
/// hyphens are removed, and the result is lower-cased.
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_whitespace = false;
    for ch in key.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if ch == '-' {
            continue;
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Returns a copy of `value` with every mapping key normalized.
///
/// Sequences and mapping values are visited unconditionally. When two keys
/// of one mapping normalize to the same key the later one wins; use
/// [`key_collisions`] to detect that case before relying on the result.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut normalized = Map::with_capacity(map.len());
            for (key, value) in map {
                normalized.insert(normalize_key(&key), normalize_keys(value));
            }
            Value::Object(normalized)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}

/// Distinct source keys of one mapping that normalize to the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    /// Location of the mapping, e.g. `locations[0]`. Empty for the root.
    pub path: String,
    /// The shared normalized key.
    pub key: String,
    /// The original keys, in source order.
    pub originals: Vec<String>,
}

/// Finds every mapping whose keys collide after normalization.
pub fn key_collisions(value: &Value) -> Vec<KeyCollision> {
    let mut collisions = Vec::new();
    collect_collisions(value, String::new(), &mut collisions);
    collisions
}

fn collect_collisions(value: &Value, path: String, collisions: &mut Vec<KeyCollision>) {
    match value {
        Value::Object(map) => {
            let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for key in map.keys() {
                groups.entry(normalize_key(key)).or_default().push(key.clone());
            }
            for (key, originals) in groups {
                if originals.len() > 1 {
                    collisions.push(KeyCollision {
                        path: path.clone(),
                        key,
                        originals,
                    });
                }
            }
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    normalize_key(key)
                } else {
                    format!("{path}.{}", normalize_key(key))
                };
                collect_collisions(child, child_path, collisions);
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_collisions(item, format!("{path}[{index}]"), collisions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_whitespace_hyphens_and_case() {
        assert_eq!(normalize_key("Booking Tel"), "booking_tel");
        assert_eq!(normalize_key("start-page"), "startpage");
        assert_eq!(normalize_key("Referral  \tTypes"), "referral_types");
        assert_eq!(normalize_key("a - b"), "a__b");
        assert_eq!(normalize_key("already_normal"), "already_normal");
    }

    #[test]
    fn rewrites_nested_keys() {
        let input = json!({
            "Name": "Clinic",
            "Locations": [{"Post-Code": "AB1", "GPS": "1, 2"}],
            "Forms": [{"Gallery": [{"Thumb URL": "/x"}]}]
        });
        let expected = json!({
            "name": "Clinic",
            "locations": [{"postcode": "AB1", "gps": "1, 2"}],
            "forms": [{"gallery": [{"thumb_url": "/x"}]}]
        });
        assert_eq!(normalize_keys(input), expected);
    }

    #[test]
    fn leaves_values_untouched() {
        let input = json!({"Name": "The Sleep-Clinic", "Tags": ["Mixed Case"]});
        let output = normalize_keys(input);
        assert_eq!(output["name"], "The Sleep-Clinic");
        assert_eq!(output["tags"][0], "Mixed Case");
    }

    #[test]
    fn reports_colliding_keys_with_path() {
        let input = json!({
            "name": "x",
            "locations": [{"Tel": "1", "tel": "2"}]
        });
        let collisions = key_collisions(&input);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].path, "locations[0]");
        assert_eq!(collisions[0].key, "tel");
        assert_eq!(collisions[0].originals, vec!["Tel", "tel"]);
    }

    #[test]
    fn no_collisions_for_distinct_keys() {
        let input = json!({"Booking Tel": "1", "Booking Fax": "2"});
        assert!(key_collisions(&input).is_empty());
    }
}
