pub mod discovery;
pub mod document;
pub mod error;
pub mod records;
pub mod vocabulary;

pub use discovery::discover_entity_files;
pub use document::{DocumentFormat, parse_document_str, read_document};
pub use error::{IngestError, Result};
pub use records::{RawRecord, RecordSet, load_combined_document, load_entity_tree};
pub use vocabulary::{
    VOCABULARY_FILE, VocabularyDocument, load_vocabularies, load_vocabulary_document,
};
