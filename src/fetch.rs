//! Remote image fetching through the proxy collaborator.
//!
//! DESIGN
//! ======
//! Browsers cannot read cross-origin image bytes, so every URL goes through a
//! proxy endpoint: `GET <proxy>?url=<remote>` answers with the raw bytes.
//! `fetch_all` runs one task per URL and returns results in input order.
//!
//! ERROR HANDLING
//! ==============
//! A failure for one URL is a `FetchError` in that URL's slot; the batch
//! carries on. A `BatchFetchError` means the batch as a whole could not run,
//! and the caller must add nothing.

use std::sync::Arc;

use canvas::ingest::RawImage;
use tokio::task::JoinSet;
use tracing::debug;

use crate::config::{ConfigError, HttpTimeouts};
use crate::error::{ErrorCode, retryable_status};

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("fetch of {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("proxy answered {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("{url} is not an image")]
    NotAnImage { url: String },
}

impl ErrorCode for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request { .. } => "E_FETCH_REQUEST",
            Self::Status { .. } => "E_FETCH_STATUS",
            Self::NotAnImage { .. } => "E_NOT_AN_IMAGE",
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Request { .. } => true,
            Self::Status { status, .. } => retryable_status(*status),
            Self::NotAnImage { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchFetchError {
    /// No proxy endpoint is configured.
    #[error("image fetch proxy is not configured")]
    ProxyUnavailable,

    /// A fetch task panicked or was cancelled.
    #[error("image batch aborted: {0}")]
    Aborted(String),
}

impl ErrorCode for BatchFetchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ProxyUnavailable => "E_PROXY_UNAVAILABLE",
            Self::Aborted(_) => "E_BATCH_ABORTED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

// =============================================================================
// FETCHER
// =============================================================================

/// Fetch one remote image as raw bytes.
#[async_trait::async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawImage, FetchError>;
}

pub struct ProxyFetcher {
    http: reqwest::Client,
    proxy_url: String,
}

impl ProxyFetcher {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(proxy_url: impl Into<String>, timeouts: HttpTimeouts) -> Result<Self, ConfigError> {
        Ok(Self::with_client(timeouts.client()?, proxy_url))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, proxy_url: impl Into<String>) -> Self {
        Self { http, proxy_url: proxy_url.into() }
    }
}

#[async_trait::async_trait]
impl ImageFetcher for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<RawImage, FetchError> {
        let request_err = |e: reqwest::Error| FetchError::Request { url: url.to_owned(), message: e.to_string() };

        let response = self.http.get(&self.proxy_url).query(&[("url", url)]).send().await.map_err(request_err)?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status { url: url.to_owned(), status });
        }
        let bytes = response.bytes().await.map_err(request_err)?;

        let Some(mime) = sniff_mime(&bytes) else {
            return Err(FetchError::NotAnImage { url: url.to_owned() });
        };
        debug!(%url, mime, len = bytes.len(), "image fetched");
        Ok(RawImage::new(mime, bytes.to_vec()))
    }
}

/// MIME type of an encoded image, judged from its magic bytes.
#[must_use]
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let Ok(format) = image::guess_format(bytes) else {
        return None;
    };
    Some(format.to_mime_type())
}

// =============================================================================
// BATCH
// =============================================================================

/// Fetch every URL concurrently. Results come back in the order of `urls`.
///
/// # Errors
///
/// Returns `Aborted` if any fetch task panics or is cancelled; the remaining
/// tasks are dropped with the batch.
pub async fn fetch_all(
    fetcher: Arc<dyn ImageFetcher>,
    urls: Vec<String>,
) -> Result<Vec<Result<RawImage, FetchError>>, BatchFetchError> {
    let mut tasks = JoinSet::new();
    let count = urls.len();
    for (slot, url) in urls.into_iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        tasks.spawn(async move { (slot, fetcher.fetch(&url).await) });
    }

    let mut results: Vec<Option<Result<RawImage, FetchError>>> = vec![None; count];
    while let Some(joined) = tasks.join_next().await {
        let (slot, result) = joined.map_err(|e| BatchFetchError::Aborted(e.to_string()))?;
        if let Some(entry) = results.get_mut(slot) {
            *entry = Some(result);
        }
    }
    Ok(results.into_iter().flatten().collect())
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
