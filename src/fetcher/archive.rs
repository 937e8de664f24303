//! Zip archive extraction with member selection
//!
//! Downloaded archives are opened in memory and only the entries selected by
//! the dependency's [`MemberFilter`](crate::fetcher::MemberFilter) are
//! written under the install root. Entry names are validated against the
//! install root before any write; an entry that would escape it aborts the
//! extraction.

use crate::core::DepkitError;
use crate::fetcher::MemberFilter;
use crate::utils::fs::{ensure_dir, is_contained_within};
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, trace};
use zip::ZipArchive;

/// Extract the members of a zip archive selected by `filter` under `root`.
///
/// Parent directories are created as needed. Directory entries themselves
/// are only materialized when selected; files create their parents
/// implicitly.
///
/// # Errors
///
/// - [`DepkitError::ArchiveError`] when the bytes are not a readable zip
/// - [`DepkitError::UnsafeArchiveEntry`] for absolute or `..` entries
/// - Filesystem errors during directory creation or writes
pub fn extract_selected(
    name: &str,
    bytes: &[u8],
    filter: &MemberFilter,
    root: &Path,
) -> Result<()> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| DepkitError::ArchiveError {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

    ensure_dir(root)?;

    let mut extracted = 0usize;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| DepkitError::ArchiveError {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        let entry_name = entry.name().to_string();
        if !filter.matches(&entry_name) {
            trace!("Skipping archive member {entry_name}");
            continue;
        }

        let Some(target) = is_contained_within(root, &entry_name) else {
            return Err(DepkitError::UnsafeArchiveEntry {
                name: name.to_string(),
                entry: entry_name,
            }
            .into());
        };

        if entry.is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }

        let mut contents = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut contents).map_err(|e| DepkitError::ArchiveError {
            name: name.to_string(),
            reason: format!("failed to read member '{entry_name}': {e}"),
        })?;
        std::fs::write(&target, &contents)
            .with_context(|| format!("Failed to write {}", target.display()))?;
        extracted += 1;
    }

    debug!("Extracted {extracted} members of '{name}' into {}", root.display());
    Ok(())
}

/// Write a single downloaded file (e.g. a one-header library) into
/// `dir/file_name`, creating `dir` as needed.
pub fn write_single_file(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<()> {
    ensure_dir(dir)?;
    let target = dir.join(file_name);
    std::fs::write(&target, bytes)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    debug!("Wrote {}", target.display());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_support::build_zip;
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_member_filtering_extracts_only_selected() {
        let temp = TempDir::new().unwrap();
        let bytes = build_zip(&[
            ("pkgname-master/include/a.hpp", b"header"),
            ("pkgname-master/tests/t.cpp", b"test"),
            ("pkgname-master/LICENSE", b"license"),
        ]);
        let filter =
            MemberFilter::contains_any(["include/", "LICENSE"]);

        extract_selected("pkgname", &bytes, &filter, temp.path()).unwrap();

        assert!(temp.path().join("pkgname-master/include/a.hpp").is_file());
        assert!(temp.path().join("pkgname-master/LICENSE").is_file());
        assert!(!temp.path().join("pkgname-master/tests/t.cpp").exists());
        assert!(!temp.path().join("pkgname-master/tests").exists());
    }

    #[test]
    fn test_exclusion_filter() {
        let temp = TempDir::new().unwrap();
        let bytes = build_zip(&[
            ("lib-master/include/lib/a.hpp", b"header"),
            ("lib-master/tests/t.cpp", b"test"),
            ("lib-master/doc/readme.md", b"doc"),
        ]);
        let filter = MemberFilter::excludes_all(["/tests/", "/doc/"]);

        extract_selected("lib", &bytes, &filter, temp.path()).unwrap();

        assert!(temp.path().join("lib-master/include/lib/a.hpp").is_file());
        assert!(!temp.path().join("lib-master/tests/t.cpp").exists());
        assert!(!temp.path().join("lib-master/doc/readme.md").exists());
    }

    #[test]
    fn test_malformed_archive_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = extract_selected(
            "broken",
            b"not a zip archive",
            &MemberFilter::contains_any(["include"]),
            temp.path(),
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("malformed archive"));
    }

    #[test]
    fn test_traversal_entry_aborts_extraction() {
        let temp = TempDir::new().unwrap();
        let bytes = build_zip(&[("../escape.txt", b"bad")]);
        let result = extract_selected(
            "evil",
            &bytes,
            &MemberFilter::contains_any(["escape"]),
            temp.path(),
        );
        assert!(result.is_err());
        assert!(!temp.path().parent().unwrap().join("escape.txt").exists());
    }

    #[test]
    fn test_write_single_file_creates_parent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("CLI11");
        write_single_file(&dir, "CLI11.hpp", b"#pragma once").unwrap();
        assert_eq!(std::fs::read(dir.join("CLI11.hpp")).unwrap(), b"#pragma once");
    }
}
