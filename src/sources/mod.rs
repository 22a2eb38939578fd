//! Remote data retrieval: the fetch capability and its implementations.
//!
//! Everything that touches the network or the filesystem goes through the
//! [`Fetcher`] trait so the loader and the animation pipeline can be driven by
//! fakes in tests.

use async_trait::async_trait;

/// Filesystem-backed fetcher for local pack directories.
mod fs;
/// reqwest-backed HTTP fetcher.
mod http;
/// Pack location rules (base path, manifest, thumbnails).
mod paths;

pub use fs::FsFetcher;
pub use http::HttpFetcher;
pub use paths::{MANIFEST_FILE, PackPaths, is_absolute_url};

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Whether intermediate caches may satisfy a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Normal caching behaviour.
    #[default]
    Default,
    /// Force revalidation with the origin (used by reload).
    NoCache,
}

/// Failure to obtain any response at all.
///
/// HTTP error statuses are not errors at this level; they come back as a
/// [`FetchResponse`] so callers can tell a missing manifest from a broken one.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connect, timeout, body read).
    #[error("{0}")]
    Transport(String),
    /// Local read failure other than "not found".
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that could not be read.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// A completed request: status line plus the full body.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    /// HTTP status code (filesystem fetches synthesize 200/404).
    pub status: u16,
    /// Reason phrase for `status`, e.g. `Not Found`.
    pub status_text: String,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Build a `200 OK` response around `body`.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            status_text: "OK".to_string(),
            body: body.into(),
        }
    }

    /// Build a bodiless response with the given status line.
    #[must_use]
    pub fn status(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: Vec::new(),
        }
    }

    /// Whether the status denotes a client or server error.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Whether the status is `404 Not Found`.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// What: Decode the body as JSON into `T`.
    ///
    /// # Errors
    /// - Returns the `serde_json` error when the body is not valid JSON for `T`.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Capability to retrieve a resource by URL or path.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// What: Fetch `url` and return the complete response.
    ///
    /// # Errors
    /// - `FetchError` when no response could be obtained at all.
    async fn fetch(&self, url: &str, cache: CacheMode) -> Result<FetchResponse>;
}

/// Fetcher that sends absolute HTTP(S) URLs over the network and reads
/// everything else from the local filesystem.
#[derive(Clone, Debug)]
pub struct RoutingFetcher {
    /// Network side.
    http: HttpFetcher,
    /// Filesystem side.
    files: FsFetcher,
}

impl RoutingFetcher {
    /// Combine an HTTP and a filesystem fetcher.
    #[must_use]
    pub const fn new(http: HttpFetcher, files: FsFetcher) -> Self {
        Self { http, files }
    }
}

#[async_trait]
impl Fetcher for RoutingFetcher {
    async fn fetch(&self, url: &str, cache: CacheMode) -> Result<FetchResponse> {
        if is_absolute_url(url) {
            self.http.fetch(url, cache).await
        } else {
            self.files.fetch(url, cache).await
        }
    }
}
