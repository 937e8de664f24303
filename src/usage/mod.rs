//! Usage descriptors for fetched dependencies
//!
//! A [`Usage`] records the build-configuration contributions a dependency
//! requires of its consumers: include search paths, system include search
//! paths, preprocessor definitions, and libraries. Fetchers return a fresh
//! `Usage` on every invocation, whether or not a download actually occurred,
//! so callers never special-case "already present" vs "just fetched".
//!
//! # Merge Semantics
//!
//! Merging is append-only per field: no existing values are discarded and no
//! deduplication is performed. Composition always produces a new descriptor
//! (copy-then-append); a `Usage` is never mutated after it has been returned
//! to a caller, so a cached upstream descriptor can be shared between
//! targets without risk of cross-target corruption.
//!
//! # Examples
//!
//! ```rust
//! use depkit::usage::Usage;
//! use std::path::PathBuf;
//!
//! let asio = Usage::new()
//!     .with_system_include(PathBuf::from("deps/asio-1.10.6/include"))
//!     .with_define("ASIO_STANDALONE");
//! let websocketpp = Usage::new()
//!     .with_system_include(PathBuf::from("deps/websocketpp-master"));
//!
//! // Upstream values first, then this dependency's own values.
//! let merged = asio.merge(&websocketpp);
//! assert_eq!(merged.system_include_paths.len(), 2);
//! assert_eq!(merged.defines, vec!["ASIO_STANDALONE"]);
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build-configuration contributions of one or more dependencies.
///
/// Field order within each `Vec` is meaningful: values appear on compiler
/// command lines in the order they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Usage {
    /// Ordinary include search paths (`-I`).
    pub include_paths: Vec<PathBuf>,
    /// System include search paths (`-isystem`), suppressing warnings from
    /// third-party headers.
    pub system_include_paths: Vec<PathBuf>,
    /// Preprocessor definitions (`-D`).
    pub defines: Vec<String>,
    /// Libraries to link (`-l`).
    pub libraries: Vec<String>,
}

impl Usage {
    /// Create an empty usage descriptor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ordinary include path.
    #[must_use]
    pub fn with_include(mut self, path: PathBuf) -> Self {
        self.include_paths.push(path);
        self
    }

    /// Append a system include path.
    #[must_use]
    pub fn with_system_include(mut self, path: PathBuf) -> Self {
        self.system_include_paths.push(path);
        self
    }

    /// Append a preprocessor definition.
    #[must_use]
    pub fn with_define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    /// Append a library.
    #[must_use]
    pub fn with_library(mut self, library: impl Into<String>) -> Self {
        self.libraries.push(library.into());
        self
    }

    /// Merge two descriptors into a new one.
    ///
    /// Per-field append: `self`'s values first, then `other`'s. Neither
    /// input is mutated, nothing is discarded, and no deduplication is
    /// performed.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.include_paths.extend(other.include_paths.iter().cloned());
        merged.system_include_paths.extend(other.system_include_paths.iter().cloned());
        merged.defines.extend(other.defines.iter().cloned());
        merged.libraries.extend(other.libraries.iter().cloned());
        merged
    }

    /// True when no field carries any value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.include_paths.is_empty()
            && self.system_include_paths.is_empty()
            && self.defines.is_empty()
            && self.libraries.is_empty()
    }

    /// Render compiler-facing preprocessor and include flags, in field
    /// order: includes, system includes, defines.
    #[must_use]
    pub fn compile_flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        for path in &self.include_paths {
            flags.push(format!("-I{}", path.display()));
        }
        for path in &self.system_include_paths {
            flags.push("-isystem".to_string());
            flags.push(path.display().to_string());
        }
        for define in &self.defines {
            flags.push(format!("-D{define}"));
        }
        flags
    }

    /// Render linker-facing library flags.
    #[must_use]
    pub fn link_flags(&self) -> Vec<String> {
        self.libraries.iter().map(|lib| format!("-l{lib}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_both_sides() {
        let upstream = Usage::new().with_system_include(PathBuf::from("a"));
        let own = Usage::new().with_system_include(PathBuf::from("b"));

        let merged = upstream.merge(&own);
        assert_eq!(
            merged.system_include_paths,
            vec![PathBuf::from("a"), PathBuf::from("b")]
        );
    }

    #[test]
    fn test_merge_does_not_mutate_inputs() {
        let upstream = Usage::new().with_define("ASIO_STANDALONE");
        let own = Usage::new().with_define("CUDA_ENABLED");

        let _ = upstream.merge(&own);
        assert_eq!(upstream.defines, vec!["ASIO_STANDALONE"]);
        assert_eq!(own.defines, vec!["CUDA_ENABLED"]);
    }

    #[test]
    fn test_merge_does_not_deduplicate() {
        let a = Usage::new().with_library("cudart");
        let b = Usage::new().with_library("cudart");
        assert_eq!(a.merge(&b).libraries, vec!["cudart", "cudart"]);
    }

    #[test]
    fn test_merge_preserves_all_fields() {
        let a = Usage::new()
            .with_include(PathBuf::from("inc"))
            .with_define("A")
            .with_library("m");
        let b = Usage::new().with_system_include(PathBuf::from("sys"));

        let merged = a.merge(&b);
        assert_eq!(merged.include_paths, vec![PathBuf::from("inc")]);
        assert_eq!(merged.system_include_paths, vec![PathBuf::from("sys")]);
        assert_eq!(merged.defines, vec!["A"]);
        assert_eq!(merged.libraries, vec!["m"]);
    }

    #[test]
    fn test_compile_flags_rendering() {
        let usage = Usage::new()
            .with_include(PathBuf::from("local/include"))
            .with_system_include(PathBuf::from("deps/json-master/include"))
            .with_define("ASIO_STANDALONE");

        assert_eq!(
            usage.compile_flags(),
            vec![
                "-Ilocal/include",
                "-isystem",
                "deps/json-master/include",
                "-DASIO_STANDALONE",
            ]
        );
    }

    #[test]
    fn test_link_flags_rendering() {
        let usage = Usage::new().with_library("cuda").with_library("cudart");
        assert_eq!(usage.link_flags(), vec!["-lcuda", "-lcudart"]);
    }

    #[test]
    fn test_empty_usage() {
        assert!(Usage::new().is_empty());
        assert!(!Usage::new().with_define("X").is_empty());
    }
}
