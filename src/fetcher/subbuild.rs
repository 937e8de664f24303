//! Delegated sub-builds for fetched dependencies
//!
//! A fetched dependency may carry its own nested build description (for
//! example, a small native binding layer that must be compiled before it is
//! usable). The fetcher does not synthesize a usage descriptor for such
//! dependencies; it invokes the [`SubBuilder`] configured on the
//! [`FetchEnv`](crate::fetcher::FetchEnv) against the nested description and
//! propagates whatever usage that build returns.

use crate::core::DepkitError;
use crate::usage::Usage;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Sub-build invocation mechanism.
///
/// `description` is the nested build description shipped inside the
/// dependency's extracted tree; the implementation returns the usage
/// descriptor the nested build exports for its consumers.
pub trait SubBuilder: Send + Sync {
    /// Run the nested build description and return its exported usage.
    fn build(&self, name: &str, description: &Path) -> Result<Usage>;
}

/// Default sub-builder: parses a usage-export manifest shipped by the
/// dependency.
///
/// The export file is a TOML rendering of [`Usage`] whose paths are
/// relative to the file's own directory:
///
/// ```toml
/// include-paths = ["include"]
/// defines = ["LUA_BINDINGS_HAS_LUAJIT=0"]
/// libraries = ["lua"]
/// ```
#[derive(Debug, Default)]
pub struct NestedManifestBuilder;

impl SubBuilder for NestedManifestBuilder {
    fn build(&self, name: &str, description: &Path) -> Result<Usage> {
        debug!("Running sub-build for '{name}' from {}", description.display());
        let content =
            std::fs::read_to_string(description).map_err(|e| DepkitError::SubBuildFailed {
                name: name.to_string(),
                reason: format!("cannot read {}: {e}", description.display()),
            })?;
        let exported: Usage = toml::from_str(&content).map_err(|e| DepkitError::SubBuildFailed {
            name: name.to_string(),
            reason: format!("invalid export manifest {}: {e}", description.display()),
        })?;

        let base = description.parent().unwrap_or_else(|| Path::new("."));
        let mut usage = exported;
        for path in usage.include_paths.iter_mut().chain(usage.system_include_paths.iter_mut()) {
            if path.is_relative() {
                let resolved = base.join(path.as_path());
                *path = resolved;
            }
        }
        Ok(usage)
    }
}
