//! `#include` dependency scanning for GPU sources
//!
//! GPU sources use the C preprocessor, so their `#include` references must
//! participate in incremental-rebuild dependency tracking exactly like host
//! sources. The scanner resolves quoted includes against the including
//! file's directory first, then the configured search paths; angle-bracket
//! includes search only the configured paths. Unresolvable includes
//! (system headers) are skipped rather than reported.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::trace;

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#)
        .expect("include regex is valid")
});

/// Recursive include scanner over a set of search paths.
#[derive(Debug, Clone)]
pub struct IncludeScanner {
    search_paths: Vec<PathBuf>,
}

impl IncludeScanner {
    /// Create a scanner resolving includes against `search_paths`.
    #[must_use]
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self {
            search_paths,
        }
    }

    /// All local headers `source` transitively depends on, sorted.
    ///
    /// Each discovered header is itself scanned, with a visited set guarding
    /// against include cycles.
    pub fn scan(&self, source: &Path) -> Result<Vec<PathBuf>> {
        let mut found = BTreeSet::new();
        let mut pending = vec![source.to_path_buf()];
        let mut visited = BTreeSet::new();

        while let Some(file) = pending.pop() {
            if !visited.insert(file.clone()) {
                continue;
            }
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read source: {}", file.display()))?;

            for capture in INCLUDE_RE.captures_iter(&content) {
                let (reference, quoted) = match (capture.get(1), capture.get(2)) {
                    (Some(m), _) => (m.as_str(), true),
                    (_, Some(m)) => (m.as_str(), false),
                    _ => continue,
                };
                match self.resolve(&file, reference, quoted) {
                    Some(header) => {
                        if found.insert(header.clone()) {
                            pending.push(header);
                        }
                    }
                    None => trace!("Unresolved include '{reference}' in {}", file.display()),
                }
            }
        }

        Ok(found.into_iter().collect())
    }

    fn resolve(&self, from: &Path, reference: &str, quoted: bool) -> Option<PathBuf> {
        if quoted {
            if let Some(parent) = from.parent() {
                let candidate = parent.join(reference);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        self.search_paths.iter().map(|dir| dir.join(reference)).find(|c| c.is_file())
    }
}
