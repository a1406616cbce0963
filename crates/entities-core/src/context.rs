use entities_model::{SourceKind, Vocabularies};
use entities_thumbs::ThumbnailSink;

/// Inputs shared by every record of one kind.
#[derive(Clone, Copy)]
pub struct EnrichContext<'a> {
    pub kind: SourceKind,
    pub vocabularies: &'a Vocabularies,
    pub thumbnails: &'a dyn ThumbnailSink,
}

impl<'a> EnrichContext<'a> {
    pub fn new(
        kind: SourceKind,
        vocabularies: &'a Vocabularies,
        thumbnails: &'a dyn ThumbnailSink,
    ) -> Self {
        Self {
            kind,
            vocabularies,
            thumbnails,
        }
    }
}
