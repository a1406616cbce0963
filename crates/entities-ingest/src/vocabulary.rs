//! Vocabulary document loading.

use std::path::Path;

use serde_json::Value;

use entities_model::Vocabularies;

use crate::error::{IngestError, Result};

/// File name of the vocabulary document inside the entity directory.
pub const VOCABULARY_FILE: &str = "valid_values.json";

/// A vocabulary document as authored, plus the tables records are checked
/// against.
#[derive(Debug, Clone)]
pub struct VocabularyDocument {
    /// Parsed document, copied into the output unchanged: every table, in
    /// authored order.
    pub document: Value,
    pub vocabularies: Vocabularies,
}

/// Reads the vocabulary document (JSON or YAML), keeping the authored form.
pub fn load_vocabulary_document(path: &Path) -> Result<VocabularyDocument> {
    let document = crate::document::read_document(path)?;
    let vocabularies = serde_json::from_value(document.clone())
        .map_err(|error| IngestError::parse(path, error))?;
    Ok(VocabularyDocument {
        document,
        vocabularies,
    })
}

/// Reads only the lookup tables of the vocabulary document.
pub fn load_vocabularies(path: &Path) -> Result<Vocabularies> {
    load_vocabulary_document(path).map(|loaded| loaded.vocabularies)
}
