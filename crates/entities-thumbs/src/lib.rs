//! Thumbnail requests and their best-effort materialization.
//!
//! Enrichment reports what it needs through [`ThumbnailSink`]; a
//! [`ThumbnailQueue`] renders the missing files in the background with a
//! [`ThumbnailMaterializer`]. Failures are logged and counted, never
//! propagated to the compile run.

pub mod error;
pub mod fetch;
pub mod materializer;
pub mod queue;
pub mod rasterize;
pub mod request;

pub use error::{Result, ThumbnailError};
pub use fetch::{ResourceFetcher, SourceFetcher};
pub use materializer::{ThumbnailMaterializer, ThumbnailOutcome};
pub use queue::{ThumbnailQueue, ThumbnailReport};
pub use rasterize::{Rasterizer, RasterizerPrograms, ShellRasterizer};
pub use request::{
    DiscardThumbnails, RESOURCE_PREFIX, RecordingSink, THUMBNAIL_WIDTH, THUMBS_DIR,
    ThumbnailRequest, ThumbnailSink, image_format, local_source, thumbnail_target,
};
