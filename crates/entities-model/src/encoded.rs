use serde::{Deserialize, Serialize};

/// A value paired with a lexically sortable key.
///
/// The downstream display layer sorts on `key` and shows `value`, so the
/// original text is always preserved next to its encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedValue {
    pub key: String,
    pub value: String,
}

impl EncodedValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
