use serde::Serialize;
use serde_json::Value;

use entities_model::{OUTPUT_FORMAT, SourceKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordList {
    pub records: Vec<Value>,
}

/// The compiled document handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputDocument {
    pub format: String,
    pub specialist: RecordList,
    pub software: RecordList,
    /// The vocabulary document exactly as authored.
    pub valid_values: Value,
}

impl OutputDocument {
    pub fn new(valid_values: Value) -> Self {
        Self {
            format: OUTPUT_FORMAT.to_string(),
            specialist: RecordList::default(),
            software: RecordList::default(),
            valid_values,
        }
    }

    pub fn records(&self, kind: SourceKind) -> &[Value] {
        match kind {
            SourceKind::Specialist => &self.specialist.records,
            SourceKind::Software => &self.software.records,
        }
    }

    pub fn records_mut(&mut self, kind: SourceKind) -> &mut Vec<Value> {
        match kind {
            SourceKind::Specialist => &mut self.specialist.records,
            SourceKind::Software => &mut self.software.records,
        }
    }

    pub fn record_count(&self) -> usize {
        self.specialist.records.len() + self.software.records.len()
    }
}
