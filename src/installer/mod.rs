//! Install orchestration
//!
//! Drives the dependency fetchers for every name declared in the project
//! manifest. Fetchers themselves are policy-free: a failed transfer is
//! fatal inside [`crate::fetcher`]. Retry and timeout policy lives here, in
//! the orchestration layer, by wrapping the archive transport in
//! [`RetryingSource`] - fetch logic never changes to accommodate policy.
//!
//! Dependencies are resolved sequentially on the orchestration task.
//! Configuration-phase fetches are serialized by construction; no locking
//! of the install root is provided or needed.

use crate::constants::{
    FETCH_ATTEMPTS, FETCH_TIMEOUT, MAX_BACKOFF_DELAY_MS, STARTING_BACKOFF_DELAY_MS,
};
use crate::fetcher::{ArchiveSource, FetchEnv, FetcherRegistry, HttpSource, NestedManifestBuilder};
use crate::manifest::Manifest;
use crate::usage::Usage;
use anyhow::Result;
use futures::future::BoxFuture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{info, warn};

/// Outcome of installing one dependency.
#[derive(Debug, Clone)]
pub struct InstalledDependency {
    /// Canonical dependency name.
    pub name: String,
    /// Whether a download actually happened (false: presence check
    /// short-circuited).
    pub fetched: bool,
    /// The composed usage descriptor for consumers of this dependency.
    pub usage: Usage,
}

/// Report for a full install run.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Per-dependency outcomes, in manifest order.
    pub dependencies: Vec<InstalledDependency>,
}

impl InstallReport {
    /// Number of dependencies that required a download.
    #[must_use]
    pub fn fetched_count(&self) -> usize {
        self.dependencies.iter().filter(|d| d.fetched).count()
    }
}

/// Transport wrapper adding bounded retry with exponential backoff and an
/// overall per-transfer timeout around an inner [`ArchiveSource`].
///
/// Only the network transfer is retried; archive and filesystem failures
/// surface immediately from the fetcher.
pub struct RetryingSource<S> {
    inner: S,
    attempts: usize,
    timeout: Duration,
}

impl<S: ArchiveSource> RetryingSource<S> {
    /// Wrap `inner` with the default policy from [`crate::constants`].
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            attempts: FETCH_ATTEMPTS,
            timeout: FETCH_TIMEOUT,
        }
    }

    /// Override the attempt count, for tests and impatient callers.
    #[must_use]
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }
}

impl<S: ArchiveSource> ArchiveSource for RetryingSource<S> {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        Box::pin(async move {
            let retry_strategy = ExponentialBackoff::from_millis(STARTING_BACKOFF_DELAY_MS)
                .max_delay(Duration::from_millis(MAX_BACKOFF_DELAY_MS))
                .take(self.attempts.saturating_sub(1));

            Retry::spawn(retry_strategy, || async {
                match tokio::time::timeout(self.timeout, self.inner.fetch(url)).await {
                    Ok(Ok(bytes)) => Ok(bytes),
                    Ok(Err(e)) => {
                        warn!("Transfer from {url} failed, may retry: {e:#}");
                        Err(e)
                    }
                    Err(_) => {
                        warn!("Transfer from {url} timed out after {:?}", self.timeout);
                        Err(anyhow::anyhow!("transfer timed out after {:?}", self.timeout))
                    }
                }
            })
            .await
        })
    }
}

/// Install every dependency declared in `manifest`, sequentially.
///
/// The returned report carries the composed usage of each dependency so a
/// caller can merge them into its targets' build configuration. A failed
/// dependency aborts the run; there is no partial-success report.
pub async fn install_all(
    manifest: &Manifest,
    manifest_path: &Path,
    registry: &FetcherRegistry,
) -> Result<InstallReport> {
    let install_root = manifest.install_root_for(manifest_path);
    let env = FetchEnv {
        install_root,
        source: Arc::new(RetryingSource::new(HttpSource::new())),
        sub_builder: Arc::new(NestedManifestBuilder),
    };
    install_with_env(manifest, &env, registry).await
}

/// [`install_all`] with a caller-provided environment (custom transport or
/// sub-builder).
pub async fn install_with_env(
    manifest: &Manifest,
    env: &FetchEnv,
    registry: &FetcherRegistry,
) -> Result<InstallReport> {
    let mut report = InstallReport::default();

    for name in &manifest.dependencies {
        let present_before = registry.exists(name, env)?;
        let usage = registry.resolve(name, env).await?;
        report.dependencies.push(InstalledDependency {
            name: name.clone(),
            fetched: !present_before,
            usage,
        });
    }

    info!(
        "Installed {} dependencies ({} fetched, {} cached)",
        report.dependencies.len(),
        report.fetched_count(),
        report.dependencies.len() - report.fetched_count()
    );
    Ok(report)
}
