use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce one thumbnail. Never fatal to a compile run.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("unsupported source location: {url}")]
    UnsupportedSource { url: String },

    #[error("cannot infer image format from {path}")]
    UnknownFormat { path: PathBuf },

    #[error("rasterizer failed: {message}")]
    Rasterize { message: String },

    #[error("rasterizer produced no output")]
    EmptyOutput,
}

impl ThumbnailError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn fetch(url: &str, error: impl ToString) -> Self {
        Self::Fetch {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
