//! Raw record loading from the entity tree or combined documents.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use entities_model::SourceKind;

use crate::discovery::discover_entity_files;
use crate::document::read_document;
use crate::error::{IngestError, Result};

/// A record exactly as authored, before any normalization.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// File the record was read from.
    pub source: PathBuf,
    /// Position within a combined document; `None` for one-record files.
    pub position: Option<usize>,
    pub value: Value,
}

impl RawRecord {
    /// Human-readable origin, e.g. `software.yaml#3`.
    pub fn origin(&self) -> String {
        match self.position {
            Some(position) => format!("{}#{position}", self.source.display()),
            None => self.source.display().to_string(),
        }
    }
}

/// All loaded records, grouped by kind in load order.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: BTreeMap<SourceKind, Vec<RawRecord>>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: SourceKind, record: RawRecord) {
        self.records.entry(kind).or_default().push(record);
    }

    pub fn extend(&mut self, kind: SourceKind, records: impl IntoIterator<Item = RawRecord>) {
        self.records.entry(kind).or_default().extend(records);
    }

    pub fn merge(&mut self, other: RecordSet) {
        for (kind, records) in other.records {
            self.extend(kind, records);
        }
    }

    pub fn get(&self, kind: SourceKind) -> &[RawRecord] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_kinds(self) -> BTreeMap<SourceKind, Vec<RawRecord>> {
        self.records
    }
}

/// Loads every record file in the entity tree. Each file holds one record.
pub fn load_entity_tree(root: &Path) -> Result<RecordSet> {
    let discovered = discover_entity_files(root)?;
    let mut set = RecordSet::new();
    for (kind, files) in discovered {
        for path in files {
            let value = read_document(&path)?;
            if !value.is_object() {
                return Err(IngestError::NotARecord { path });
            }
            debug!(kind = %kind, path = %path.display(), "loaded record");
            set.push(
                kind,
                RawRecord {
                    source: path,
                    position: None,
                    value,
                },
            );
        }
    }
    info!(
        root = %root.display(),
        record_count = set.len(),
        "entity tree loaded"
    );
    Ok(set)
}

/// Loads a combined document holding a sequence of records.
///
/// The kind is inferred from the file stem (`specialists.yaml`,
/// `software.json`) unless given explicitly.
pub fn load_combined_document(
    path: &Path,
    kind: Option<SourceKind>,
) -> Result<(SourceKind, Vec<RawRecord>)> {
    let kind = match kind {
        Some(kind) => kind,
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(SourceKind::from_stem)
            .ok_or_else(|| IngestError::UnknownKind {
                path: path.to_path_buf(),
            })?,
    };
    let Value::Array(items) = read_document(path)? else {
        return Err(IngestError::NotASequence {
            path: path.to_path_buf(),
        });
    };
    let mut records = Vec::with_capacity(items.len());
    for (position, value) in items.into_iter().enumerate() {
        if !value.is_object() {
            return Err(IngestError::NotARecord {
                path: PathBuf::from(format!("{}#{position}", path.display())),
            });
        }
        records.push(RawRecord {
            source: path.to_path_buf(),
            position: Some(position),
            value,
        });
    }
    info!(
        kind = %kind,
        path = %path.display(),
        record_count = records.len(),
        "combined document loaded"
    );
    Ok((kind, records))
}
