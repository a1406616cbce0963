use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, ThumbnailError};
use crate::fetch::{ResourceFetcher, SourceFetcher};
use crate::rasterize::{Rasterizer, RasterizerPrograms, ShellRasterizer};
use crate::request::{ThumbnailRequest, image_format, thumbnail_target};

/// What [`ThumbnailMaterializer::ensure_thumbnail`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailOutcome {
    /// The thumbnail was rendered and written.
    Created { path: PathBuf, bytes: usize },
    /// The target file already existed; nothing was fetched.
    AlreadyPresent { path: PathBuf },
    /// The reference does not point into the generated thumbnail tree.
    Skipped,
}

/// Makes sure a thumbnail file exists, rendering it on demand.
#[derive(Clone)]
pub struct ThumbnailMaterializer {
    resource_root: PathBuf,
    fetcher: Arc<dyn SourceFetcher>,
    rasterizer: Arc<dyn Rasterizer>,
}

impl ThumbnailMaterializer {
    pub fn new(
        resource_root: impl Into<PathBuf>,
        fetcher: impl SourceFetcher + 'static,
        rasterizer: impl Rasterizer + 'static,
    ) -> Self {
        Self {
            resource_root: resource_root.into(),
            fetcher: Arc::new(fetcher),
            rasterizer: Arc::new(rasterizer),
        }
    }

    /// Local files plus HTTP fetching, rendered with the shell pipeline.
    pub fn with_programs(
        resource_root: impl Into<PathBuf>,
        programs: RasterizerPrograms,
    ) -> Result<Self> {
        let resource_root = resource_root.into();
        let fetcher = ResourceFetcher::new(resource_root.clone())?;
        Ok(Self::new(
            resource_root,
            fetcher,
            ShellRasterizer::new(programs),
        ))
    }

    pub fn resource_root(&self) -> &Path {
        &self.resource_root
    }

    /// File the reference resolves to, if it is a generated thumbnail.
    pub fn target_path(&self, reference: &str) -> Option<PathBuf> {
        thumbnail_target(&self.resource_root, reference)
    }

    /// Renders the requested thumbnail unless its file already exists.
    ///
    /// The existence check is not guarded against other processes; two
    /// concurrent runs may both render the same file, and the last whole-file
    /// write wins.
    pub fn ensure_thumbnail(&self, request: &ThumbnailRequest) -> Result<ThumbnailOutcome> {
        let Some(path) = self.target_path(&request.reference) else {
            debug!(reference = %request.reference, "not a generated thumbnail");
            return Ok(ThumbnailOutcome::Skipped);
        };
        if path.exists() {
            debug!(path = %path.display(), "thumbnail already present");
            return Ok(ThumbnailOutcome::AlreadyPresent { path });
        }
        let format = image_format(&path).ok_or_else(|| ThumbnailError::UnknownFormat {
            path: path.clone(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| ThumbnailError::io(parent, error))?;
        }

        info!(
            source = %request.source_url,
            target = %path.display(),
            page = request.page,
            "creating thumbnail"
        );
        let document = self.fetcher.fetch(&request.source_url)?;
        let image = self
            .rasterizer
            .rasterize(&document, request.page, request.width, &format)?;
        std::fs::write(&path, &image).map_err(|error| ThumbnailError::io(&path, error))?;
        Ok(ThumbnailOutcome::Created {
            path,
            bytes: image.len(),
        })
    }
}
