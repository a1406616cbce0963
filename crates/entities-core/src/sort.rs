use serde_json::Value;

use entities_normalize::compare_sort_keys;

/// The record's `name.key`, or the empty string when absent.
pub fn record_sort_key(record: &Value) -> &str {
    record
        .pointer("/name/key")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Sorts enriched records by name key, ignoring punctuation. Records whose
/// keys compare equal keep their load order.
pub fn sort_records(records: &mut [Value]) {
    records.sort_by(|left, right| compare_sort_keys(record_sort_key(left), record_sort_key(right)));
}
