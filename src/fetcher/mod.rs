//! Dependency fetchers
//!
//! A fetcher ensures that a named third-party source tree is present under
//! the install root exactly once, and reports how to consume it as a
//! [`Usage`] descriptor. Every fetch operation follows the same shape:
//!
//! 1. compose the usage of required upstream dependencies (fetching them
//!    first when needed),
//! 2. check whether the dependency's probe directory already exists - the
//!    sole idempotency guard; an existing directory is trusted as a fully
//!    valid cache entry and no network access happens,
//! 3. otherwise download the archive, extract the members selected by the
//!    dependency's filter (or write the single downloaded file), and apply
//!    the normalize-rename when the archive unpacks into a versioned
//!    directory name,
//! 4. run the dependency's delegated sub-build when it ships one,
//! 5. return the composed usage - identical content whether or not a fetch
//!    actually occurred.
//!
//! Any network, archive, or filesystem failure aborts the fetch; there is no
//! partial-success state. Retry policy belongs to the orchestration layer
//! (see [`crate::installer`]), not to the fetcher.
//!
//! # Submodules
//!
//! - [`archive`] - zip extraction with member selection
//! - [`catalog`] - the built-in dependency descriptors
//! - [`registry`] - name lookup and transitive resolution
//! - [`source`] - the fetch-bytes-by-URL transport seam
//! - [`subbuild`] - delegated sub-builds for dependencies carrying a nested
//!   build description

pub mod archive;
pub mod catalog;
pub mod registry;
pub mod source;
pub mod subbuild;

pub use registry::FetcherRegistry;
pub use source::{ArchiveSource, HttpSource};
pub use subbuild::{NestedManifestBuilder, SubBuilder};

use crate::core::DepkitError;
use crate::usage::Usage;
use crate::utils::fs::atomic_rename;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Predicate selecting which archive members to extract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberFilter {
    /// Keep entries whose name contains any of the needles.
    ContainsAny(Vec<String>),
    /// Keep entries whose name contains none of the needles.
    ExcludesAll(Vec<String>),
}

impl MemberFilter {
    /// Selection filter keeping entries that contain any listed substring.
    pub fn contains_any<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ContainsAny(needles.into_iter().map(Into::into).collect())
    }

    /// Exclusion filter keeping entries that contain none of the listed
    /// substrings.
    pub fn excludes_all<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ExcludesAll(needles.into_iter().map(Into::into).collect())
    }

    /// Whether an archive entry name is selected for extraction.
    #[must_use]
    pub fn matches(&self, entry: &str) -> bool {
        match self {
            Self::ContainsAny(needles) => needles.iter().any(|n| entry.contains(n.as_str())),
            Self::ExcludesAll(needles) => !needles.iter().any(|n| entry.contains(n.as_str())),
        }
    }
}

/// Normalization of a versioned archive directory to a stable name.
///
/// Some archives unpack into a directory carrying the branch or version
/// label (`lua-bindings-master`). Downstream include paths must never encode
/// a version string, so the fetcher renames the directory exactly once,
/// atomically, guarded by the same presence check as the fetch itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    /// Directory name the archive unpacks into, relative to the install root.
    pub from: String,
    /// Stable directory name, relative to the install root.
    pub to: String,
}

/// What the dependency's remote reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A zip archive; selected members are extracted under the install root.
    Archive {
        /// Member-selection predicate.
        filter: MemberFilter,
        /// Optional post-extraction rename to a version-independent name.
        rename: Option<Rename>,
    },
    /// A single file (one-header library) written into the probe directory.
    SingleFile {
        /// File name to write inside the probe directory.
        file_name: String,
    },
}

/// Static description of one named third-party dependency.
#[derive(Debug, Clone)]
pub struct DependencyDescriptor {
    /// Canonical dependency name.
    pub name: String,
    /// Remote archive (or single-file) URL.
    pub url: String,
    /// Subdirectory of the install root whose existence marks the
    /// dependency as installed.
    pub probe_dir: String,
    /// Remote payload kind and extraction policy.
    pub payload: Payload,
    /// Names of upstream dependencies whose usage this one requires.
    pub requires: Vec<String>,
    /// This dependency's own usage contribution, with paths relative to the
    /// install root.
    pub own_usage: Usage,
    /// Nested build description path relative to the install root, for
    /// dependencies that carry their own build.
    pub sub_build: Option<String>,
}

/// Ambient context shared by all fetchers in an install run.
pub struct FetchEnv {
    /// Directory under which all dependencies are unpacked.
    pub install_root: PathBuf,
    /// Archive transport.
    pub source: Arc<dyn ArchiveSource>,
    /// Sub-build invocation mechanism.
    pub sub_builder: Arc<dyn SubBuilder>,
}

impl FetchEnv {
    /// Create an environment with the production transport and sub-builder.
    #[must_use]
    pub fn new(install_root: PathBuf) -> Self {
        Self {
            install_root,
            source: Arc::new(HttpSource::new()),
            sub_builder: Arc::new(NestedManifestBuilder),
        }
    }
}

/// A dependency fetcher: one descriptor plus the exists/generate contract.
pub struct Fetcher<'a> {
    descriptor: &'a DependencyDescriptor,
}

impl<'a> Fetcher<'a> {
    /// Wrap a descriptor.
    #[must_use]
    pub fn new(descriptor: &'a DependencyDescriptor) -> Self {
        Self {
            descriptor,
        }
    }

    /// Presence check: does the dependency's probe directory exist?
    ///
    /// This is the sole idempotency guard. No checksum or staleness
    /// comparison is performed; an existing directory is trusted as a valid
    /// cache entry.
    #[must_use]
    pub fn exists(&self, env: &FetchEnv) -> bool {
        env.install_root.join(&self.descriptor.probe_dir).exists()
    }

    /// Ensure the dependency is installed and return its composed usage.
    ///
    /// `upstream` is the merged usage of the dependency's required upstream
    /// dependencies, already resolved by the registry. The returned value is
    /// upstream values first, then this dependency's own contribution, then
    /// anything a delegated sub-build exports - recomputed on every call so
    /// callers never distinguish "already present" from "just fetched".
    pub async fn generate(&self, env: &FetchEnv, upstream: &Usage) -> Result<Usage> {
        let descriptor = self.descriptor;

        if self.exists(env) {
            debug!("Dependency '{}' already present, skipping fetch", descriptor.name);
        } else {
            self.fetch_and_extract(env).await?;
            info!("Installed dependency '{}'", descriptor.name);
        }

        let mut usage = upstream.merge(&self.resolved_own_usage(&env.install_root));

        if let Some(sub_build) = &descriptor.sub_build {
            let description = env.install_root.join(sub_build);
            let exported = env.sub_builder.build(&descriptor.name, &description)?;
            usage = usage.merge(&exported);
        }

        Ok(usage)
    }

    /// Download and unpack the dependency. Precondition: the presence check
    /// returned false.
    async fn fetch_and_extract(&self, env: &FetchEnv) -> Result<()> {
        let descriptor = self.descriptor;
        info!("Fetching dependency '{}' from {}", descriptor.name, descriptor.url);

        let bytes = env.source.fetch(&descriptor.url).await.map_err(|e| {
            DepkitError::FetchFailed {
                name: descriptor.name.clone(),
                url: descriptor.url.clone(),
                reason: format!("{e:#}"),
            }
        })?;

        match &descriptor.payload {
            Payload::Archive {
                filter,
                rename,
            } => {
                archive::extract_selected(&descriptor.name, &bytes, filter, &env.install_root)?;
                if let Some(rename) = rename {
                    let from = env.install_root.join(&rename.from);
                    let to = env.install_root.join(&rename.to);
                    if from.exists() {
                        atomic_rename(&from, &to)?;
                    } else if !to.exists() {
                        return Err(DepkitError::FileSystemError {
                            operation: "rename".to_string(),
                            path: from.display().to_string(),
                        }
                        .into());
                    }
                }
            }
            Payload::SingleFile {
                file_name,
            } => {
                let dir = env.install_root.join(&descriptor.probe_dir);
                archive::write_single_file(&dir, file_name, &bytes)?;
            }
        }

        Ok(())
    }

    /// The descriptor's own usage with relative paths resolved against the
    /// install root.
    fn resolved_own_usage(&self, install_root: &Path) -> Usage {
        let own = &self.descriptor.own_usage;
        let mut resolved = own.clone();
        for path in
            resolved.include_paths.iter_mut().chain(resolved.system_include_paths.iter_mut())
        {
            if path.is_relative() {
                let joined = install_root.join(path.as_path());
                *path = joined;
            }
        }
        resolved
    }
}
