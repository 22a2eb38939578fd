use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};

use super::{CacheMode, FetchResponse, Fetcher, Result};

/// HTTP fetcher with a pooled `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    /// Shared client; cloning is cheap and keeps the connection pool.
    client: reqwest::Client,
}

impl HttpFetcher {
    /// What: Build a fetcher with connect/request timeouts and a descriptive user agent.
    ///
    /// Inputs:
    /// - `timeout`: Overall request timeout.
    ///
    /// Output:
    /// - A ready fetcher; falls back to a default client if the builder fails.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json,application/octet-stream;q=0.9,*/*;q=0.8"),
        );
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .timeout(timeout)
            .user_agent(format!("stickerpicker/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "failed to build HTTP client; using defaults");
                reqwest::Client::new()
            });
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, cache: CacheMode) -> Result<FetchResponse> {
        let mut request = self.client.get(url);
        if cache == CacheMode::NoCache {
            request = request
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            "fetched"
        );
        Ok(FetchResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_vec(),
        })
    }
}
