//! Cross-platform utilities and helpers
//!
//! File system operations used by the fetchers: directory creation, atomic
//! renames, and containment checks for archive entry paths.

pub mod fs;

pub use fs::{atomic_rename, ensure_dir, is_contained_within};
