//! Source document retrieval.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Result, ThumbnailError};
use crate::request::{RESOURCE_PREFIX, local_source};

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Retrieves the bytes of a source document.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Reads `/resources/...` URLs from the resource root and fetches
/// `http`/`https` URLs over the network. No retries.
pub struct ResourceFetcher {
    resource_root: PathBuf,
    client: Client,
}

impl ResourceFetcher {
    pub fn new(resource_root: impl Into<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("compile-entities/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| ThumbnailError::fetch("http client", error))?;
        Ok(Self {
            resource_root: resource_root.into(),
            client,
        })
    }

    fn fetch_remote(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "fetching remote document");
        let response = self
            .client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|error| ThumbnailError::fetch(url, error))?;
        let bytes = response
            .bytes()
            .map_err(|error| ThumbnailError::fetch(url, error))?;
        Ok(bytes.to_vec())
    }
}

impl SourceFetcher for ResourceFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with(RESOURCE_PREFIX) {
            let path = local_source(&self.resource_root, url).ok_or_else(|| {
                ThumbnailError::UnsupportedSource {
                    url: url.to_string(),
                }
            })?;
            debug!(path = %path.display(), "reading local document");
            return std::fs::read(&path).map_err(|error| ThumbnailError::io(path, error));
        }
        if url.starts_with("https://") || url.starts_with("http://") {
            return self.fetch_remote(url);
        }
        Err(ThumbnailError::UnsupportedSource {
            url: url.to_string(),
        })
    }
}
