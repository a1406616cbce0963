use std::path::PathBuf;

use entities_core::RecordError;
use entities_model::SourceKind;
use entities_thumbs::ThumbnailReport;

#[derive(Debug, Default)]
pub struct CompileResult {
    /// Written output file; `None` on a dry run or when records were invalid.
    pub output: Option<PathBuf>,
    pub kinds: Vec<KindSummary>,
    /// Thumbnail queue outcome, when thumbnails were enabled.
    pub thumbnails: Option<ThumbnailReport>,
    pub errors: Vec<RecordError>,
    pub dry_run: bool,
}

impl CompileResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KindSummary {
    pub kind: SourceKind,
    pub records: usize,
}
