//! Archive transport for dependency fetchers
//!
//! [`ArchiveSource`] is the seam between fetch logic and the network: a
//! fetcher asks for the bytes behind a URL and nothing else. The production
//! implementation is [`HttpSource`]; the orchestrator wraps it with retry
//! and timeout policy, and tests substitute in-memory sources to observe
//! exactly when network I/O happens.

use crate::constants::USER_AGENT;
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use tracing::debug;

/// Fetch-bytes-by-URL abstraction.
///
/// Implementations must be cheap to share; the same source is used for
/// every dependency in an install run.
pub trait ArchiveSource: Send + Sync {
    /// Retrieve the complete contents behind `url`.
    ///
    /// The transfer is in-memory by design: fetched archives are small
    /// header-only libraries, and extraction operates on the full byte
    /// buffer.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;
}

/// HTTP(S) archive source backed by [`reqwest`].
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Create an HTTP source with the depkit user agent.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, which indicates a
    /// broken installation rather than a recoverable condition.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to construct HTTP client");
        Self {
            client,
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveSource for HttpSource {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            debug!("Downloading {url}");
            let response = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("Request to {url} failed"))?
                .error_for_status()
                .with_context(|| format!("Server rejected request for {url}"))?;

            let bytes =
                response.bytes().await.with_context(|| format!("Transfer from {url} failed"))?;
            debug!("Downloaded {} bytes from {url}", bytes.len());
            Ok(bytes.to_vec())
        })
    }
}
