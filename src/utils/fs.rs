//! File system utilities for dependency extraction
//!
//! All mutation of the install root goes through this module: recursive
//! directory creation before extraction, the atomic rename used to normalize
//! versioned archive directory names, and the containment check that rejects
//! archive entries attempting to escape the install root.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Ensures a directory exists, creating it and all parent directories if
/// necessary.
///
/// # Returns
///
/// - `Ok(())` if the directory exists or was successfully created
/// - `Err` if the path exists but is not a directory, or creation fails
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            format!(
                "Failed to create directory: {}\nCheck directory permissions and path validity",
                path.display()
            )
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!(
            "Path exists but is not a directory: {}",
            path.display()
        ));
    }
    Ok(())
}

/// Atomically rename `from` to `to`.
///
/// Used to normalize a versioned archive directory (e.g.
/// `lua-bindings-master`) to its stable name. `std::fs::rename` is a single
/// syscall on the same filesystem, so a crash never leaves both names
/// absent: either the rename happened or the versioned name is still there
/// for the next run to retry.
pub fn atomic_rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            from.display(),
            to.display()
        )
    })
}

/// Resolve a relative archive entry name against `root`, rejecting entries
/// that would escape it.
///
/// Returns the joined path when the entry stays inside `root`; `None` for
/// absolute entries or entries containing `..` components.
#[must_use]
pub fn is_contained_within(root: &Path, entry: &str) -> Option<PathBuf> {
    let relative = Path::new(entry);
    if relative.is_absolute() {
        return None;
    }
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => return None,
        }
    }
    Some(root.join(relative))
}
