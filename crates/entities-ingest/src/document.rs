//! Source document parsing.
//!
//! Records may be authored as JSON or YAML. Both are parsed into
//! `serde_json::Value` so the rest of the pipeline sees one shape.

use std::path::Path;

use serde_json::Value;

use crate::error::{IngestError, Result};

/// Serialization format of a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(DocumentFormat::Json)
        } else if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") {
            Some(DocumentFormat::Yaml)
        } else {
            None
        }
    }
}

/// Parses document text in the given format.
pub fn parse_document_str(path: &Path, text: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str(text).map_err(|error| IngestError::parse(path, error))
        }
        DocumentFormat::Yaml => {
            serde_yaml::from_str(text).map_err(|error| IngestError::parse(path, error))
        }
    }
}

/// Reads and parses a document, detecting its format from the extension.
pub fn read_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = std::fs::read_to_string(path).map_err(|error| IngestError::io(path, error))?;
    parse_document_str(path, &text, format)
}
