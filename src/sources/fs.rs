use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{CacheMode, FetchError, FetchResponse, Fetcher, Result};

/// Reads pack files from a directory tree, mapping missing files to `404`.
#[derive(Clone, Debug, Default)]
pub struct FsFetcher {
    /// Directory that relative locations are resolved against.
    root: PathBuf,
}

impl FsFetcher {
    /// Create a fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Fetcher for FsFetcher {
    async fn fetch(&self, url: &str, _cache: CacheMode) -> Result<FetchResponse> {
        let location = url.strip_prefix("file://").unwrap_or(url);
        let path = self.root.join(location);
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(FetchResponse::ok(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "file not found");
                Ok(FetchResponse::status(404, "Not Found"))
            }
            Err(source) => Err(FetchError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}
