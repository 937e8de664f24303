//! Project manifest parsing and discovery (depkit.toml)
//!
//! The manifest declares which third-party dependencies a project wants in
//! its install root, where that root lives, and how the GPU toolchain should
//! be configured. Like Cargo, the manifest is discovered by walking from the
//! current directory toward the filesystem root.
//!
//! # Manifest Format
//!
//! ```toml
//! # Directory the dependencies are unpacked into, relative to this file.
//! install-root = "deps"
//!
//! # Dependencies by canonical name (see the built-in catalog).
//! dependencies = ["asio", "json", "websocketpp", "lua-bindings"]
//!
//! [toolchain]
//! # Abort configuration when nvcc is not on the PATH.
//! required = true
//! # Hardware target passed as -arch; defaults to sm_35 when omitted.
//! cuda-architecture = "sm_70"
//! # Host compiler flags forwarded through nvcc via -Xcompiler.
//! host-flags = ["-Wall", "-O2"]
//! ```

use crate::constants::{DEFAULT_INSTALL_ROOT, MANIFEST_FILENAME};
use crate::core::DepkitError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed contents of a depkit.toml manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Manifest {
    /// Install root relative to the manifest directory.
    #[serde(default = "default_install_root")]
    pub install_root: PathBuf,

    /// Dependencies to fetch, by canonical name.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// GPU toolchain configuration.
    #[serde(default)]
    pub toolchain: ToolchainSection,
}

/// The `[toolchain]` section of the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ToolchainSection {
    /// When true, configuration aborts if nvcc cannot be located.
    #[serde(default)]
    pub required: bool,

    /// Hardware target identifier for -arch. `None` uses the default.
    #[serde(default)]
    pub cuda_architecture: Option<String>,

    /// Host compiler flags forwarded through the wrapper marker.
    #[serde(default)]
    pub host_flags: Vec<String>,
}

fn default_install_root() -> PathBuf {
    PathBuf::from(DEFAULT_INSTALL_ROOT)
}

impl Manifest {
    /// Parse a manifest from a file.
    ///
    /// # Errors
    ///
    /// Returns [`DepkitError::ManifestParseError`] for syntax errors or
    /// unknown fields.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading manifest from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest: Self = toml::from_str(&content).map_err(|e| DepkitError::ManifestParseError {
            file: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(manifest)
    }

    /// Locate a manifest by walking from `start_dir` toward the filesystem
    /// root, returning the first depkit.toml found.
    ///
    /// # Errors
    ///
    /// Returns [`DepkitError::ManifestNotFound`] when no manifest exists in
    /// `start_dir` or any ancestor.
    pub fn find(start_dir: &Path) -> Result<PathBuf> {
        let mut dir = Some(start_dir);
        while let Some(current) = dir {
            let candidate = current.join(MANIFEST_FILENAME);
            if candidate.is_file() {
                debug!("Found manifest at {}", candidate.display());
                return Ok(candidate);
            }
            dir = current.parent();
        }
        Err(DepkitError::ManifestNotFound.into())
    }

    /// Resolve the install root against the directory containing the
    /// manifest file.
    #[must_use]
    pub fn install_root_for(&self, manifest_path: &Path) -> PathBuf {
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        base.join(&self.install_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_manifest() {
        let manifest: Manifest = toml::from_str(
            r#"
            install-root = "third_party"
            dependencies = ["asio", "websocketpp"]

            [toolchain]
            required = true
            cuda-architecture = "sm_70"
            host-flags = ["-Wall"]
            "#,
        )
        .unwrap();

        assert_eq!(manifest.install_root, PathBuf::from("third_party"));
        assert_eq!(manifest.dependencies, vec!["asio", "websocketpp"]);
        assert!(manifest.toolchain.required);
        assert_eq!(manifest.toolchain.cuda_architecture.as_deref(), Some("sm_70"));
        assert_eq!(manifest.toolchain.host_flags, vec!["-Wall"]);
    }

    #[test]
    fn test_parse_minimal_manifest_uses_defaults() {
        let manifest: Manifest = toml::from_str("dependencies = [\"json\"]").unwrap();
        assert_eq!(manifest.install_root, PathBuf::from("deps"));
        assert!(!manifest.toolchain.required);
        assert!(manifest.toolchain.cuda_architecture.is_none());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result: std::result::Result<Manifest, _> = toml::from_str("install_dir = \"deps\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_find_walks_parent_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("depkit.toml"), "dependencies = []").unwrap();
        let nested = temp.path().join("src/module");
        fs::create_dir_all(&nested).unwrap();

        let found = Manifest::find(&nested).unwrap();
        assert_eq!(found, temp.path().join("depkit.toml"));
    }

    #[test]
    fn test_find_missing_manifest_errors() {
        let temp = TempDir::new().unwrap();
        assert!(Manifest::find(temp.path()).is_err());
    }

    #[test]
    fn test_install_root_resolution() {
        let manifest: Manifest = toml::from_str("install-root = \"deps\"").unwrap();
        let root = manifest.install_root_for(Path::new("/project/depkit.toml"));
        assert_eq!(root, PathBuf::from("/project/deps"));
    }
}
