use serde_json::Value;
use thiserror::Error;

use entities_model::SourceKind;

/// Everything wrong with one record, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} entry {index}{}: {}", origin_suffix(.origin), .messages.join("; "))]
pub struct RecordError {
    pub kind: SourceKind,
    /// Position of the record among records of its kind, in load order.
    pub index: usize,
    /// Where the record was read from, when known.
    pub origin: Option<String>,
    pub messages: Vec<String>,
    /// The record as it stood when enrichment stopped, as JSON.
    pub dump: String,
}

impl RecordError {
    pub fn new(kind: SourceKind, index: usize, messages: Vec<String>, record: &Value) -> Self {
        Self {
            kind,
            index,
            origin: None,
            messages,
            dump: serde_json::to_string(record).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

fn origin_suffix(origin: &Option<String>) -> String {
    origin
        .as_deref()
        .map(|origin| format!(" ({origin})"))
        .unwrap_or_default()
}

/// Messages gathered while enriching one record.
#[derive(Debug, Default)]
pub(crate) struct Problems {
    messages: Vec<String>,
}

impl Problems {
    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub(crate) fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        self.messages.extend(messages);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
