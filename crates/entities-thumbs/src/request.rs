//! Thumbnail requests and the sink trait enrichment reports them to.

use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// Width, in pixels, of every generated thumbnail.
pub const THUMBNAIL_WIDTH: u32 = 150;

/// URL prefix of files served from the resource root.
pub const RESOURCE_PREFIX: &str = "/resources/";

/// Subdirectory of the resource root that holds generated thumbnails.
pub const THUMBS_DIR: &str = "thumbs";

/// A request to make sure one thumbnail exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRequest {
    /// Thumbnail reference as written in the record, e.g.
    /// `/resources/thumbs/forms/diary.png`.
    pub reference: String,
    /// Document the thumbnail is rendered from.
    pub source_url: String,
    /// One-based page of the document to render.
    pub page: u32,
    /// Target width in pixels.
    pub width: u32,
}

impl ThumbnailRequest {
    pub fn new(reference: impl Into<String>, source_url: impl Into<String>, page: u32) -> Self {
        Self {
            reference: reference.into(),
            source_url: source_url.into(),
            page,
            width: THUMBNAIL_WIDTH,
        }
    }
}

/// Receives thumbnail requests raised while enriching records.
///
/// Implementations must not block on the work itself: enrichment only
/// announces what it needs.
pub trait ThumbnailSink {
    fn request(&self, request: ThumbnailRequest);
}

/// Sink that ignores every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardThumbnails;

impl ThumbnailSink for DiscardThumbnails {
    fn request(&self, _request: ThumbnailRequest) {}
}

/// Sink that keeps requests in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    requests: Mutex<Vec<ThumbnailRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<ThumbnailRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl ThumbnailSink for RecordingSink {
    fn request(&self, request: ThumbnailRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }
}

/// Joins a path below the resource root, refusing anything that would
/// escape it.
fn join_relative(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let safe = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    (safe && relative.components().next().is_some()).then(|| root.join(relative))
}

/// Resolves a thumbnail reference to its file below the resource root.
///
/// Only references under `/resources/thumbs/` are generated; anything else
/// (external images, hand-made files elsewhere) yields `None`.
pub fn thumbnail_target(resource_root: &Path, reference: &str) -> Option<PathBuf> {
    let relative = reference.strip_prefix(RESOURCE_PREFIX)?;
    let inner = relative.strip_prefix(THUMBS_DIR)?.strip_prefix('/')?;
    if inner.is_empty() {
        return None;
    }
    join_relative(resource_root, relative)
}

/// Resolves a `/resources/...` URL to a local file, dropping any fragment
/// and decoding escaped spaces.
pub fn local_source(resource_root: &Path, url: &str) -> Option<PathBuf> {
    let relative = url.strip_prefix(RESOURCE_PREFIX)?;
    let relative = relative.split('#').next().unwrap_or(relative);
    join_relative(resource_root, &relative.replace("%20", " "))
}

/// Image format named by the target's extension, e.g. `png`.
pub fn image_format(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit());
    valid.then(|| ext.to_string())
}
