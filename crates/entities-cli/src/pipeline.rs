//! Compile pipeline with explicit stages.
//!
//! 1. **Ingest**: load the vocabulary, the entity tree, and combined documents
//! 2. **Enrich**: normalize keys and validate/enrich every record
//! 3. **Sort**: order each kind by name key
//!
//! The result is the output document as a value; writing it is up to the
//! caller. Any invalid record fails the whole compile.

use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use entities_core::{EnrichContext, OutputDocument, RecordError, compile_record, sort_records};
use entities_ingest::{
    IngestError, RecordSet, VocabularyDocument, load_combined_document, load_entity_tree,
    load_vocabulary_document,
};
use entities_model::SourceKind;
use entities_thumbs::ThumbnailSink;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("{} invalid record(s)", .0.len())]
    Validation(Vec<RecordError>),

    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where records come from.
#[derive(Debug, Clone, Default)]
pub struct CompileInputs {
    /// Entity tree to scan, if any.
    pub entities_dir: Option<PathBuf>,
    pub combined: Vec<PathBuf>,
    pub vocabulary: PathBuf,
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    pub records: RecordSet,
    pub vocabulary: VocabularyDocument,
}

pub fn ingest(inputs: &CompileInputs) -> Result<IngestResult, CompileError> {
    let vocabulary = load_vocabulary_document(&inputs.vocabulary)?;
    let vocabularies = &vocabulary.vocabularies;
    debug!(
        path = %inputs.vocabulary.display(),
        specialist_types = vocabularies.specialist_type.len(),
        referral_types = vocabularies.referral_types.len(),
        procedure_types = vocabularies.procedure_type.len(),
        "vocabulary loaded"
    );

    let mut records = RecordSet::new();
    if let Some(dir) = &inputs.entities_dir {
        records.merge(load_entity_tree(dir)?);
    }
    for path in &inputs.combined {
        let (kind, loaded) = load_combined_document(path, None)?;
        records.extend(kind, loaded);
    }
    if records.is_empty() {
        warn!("no entity records found");
    }
    Ok(IngestResult {
        records,
        vocabulary,
    })
}

// ============================================================================
// Stage 2-3: Enrich and sort
// ============================================================================

/// Enriches every record and sorts each kind, or returns every record
/// error found.
pub fn compile_records(
    records: RecordSet,
    vocabulary: &VocabularyDocument,
    thumbnails: &dyn ThumbnailSink,
) -> Result<OutputDocument, CompileError> {
    let vocabularies = &vocabulary.vocabularies;
    let mut document = OutputDocument::new(vocabulary.document.clone());
    let mut errors = Vec::new();

    for (kind, raw_records) in records.into_kinds() {
        let span = info_span!("enrich", kind = %kind, record_count = raw_records.len());
        let _guard = span.enter();
        let ctx = EnrichContext::new(kind, vocabularies, thumbnails);
        for (index, raw) in raw_records.into_iter().enumerate() {
            let origin = raw.origin();
            match compile_record(raw.value, index, &ctx) {
                Ok(record) => document.records_mut(kind).push(record),
                Err(error) => {
                    debug!(%origin, %error, "record rejected");
                    errors.push(error.with_origin(origin));
                }
            }
        }
    }

    if !errors.is_empty() {
        return Err(CompileError::Validation(errors));
    }
    for kind in SourceKind::ALL {
        sort_records(document.records_mut(kind));
    }
    Ok(document)
}

/// Runs every stage.
pub fn run_pipeline(
    inputs: &CompileInputs,
    thumbnails: &dyn ThumbnailSink,
) -> Result<OutputDocument, CompileError> {
    let ingest_start = Instant::now();
    let IngestResult {
        records,
        vocabulary,
    } = info_span!("ingest").in_scope(|| ingest(inputs))?;
    info!(
        record_count = records.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let enrich_start = Instant::now();
    let document = compile_records(records, &vocabulary, thumbnails)?;
    info!(
        specialist = document.records(SourceKind::Specialist).len(),
        software = document.records(SourceKind::Software).len(),
        duration_ms = enrich_start.elapsed().as_millis(),
        "enrich complete"
    );
    Ok(document)
}

/// Serializes the output document.
pub fn render_output(document: &OutputDocument, pretty: bool) -> Result<String, CompileError> {
    let text = if pretty {
        serde_json::to_string_pretty(document)?
    } else {
        serde_json::to_string(document)?
    };
    Ok(text)
}
