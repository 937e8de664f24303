//! Global constants used throughout the depkit codebase.
//!
//! Timeout durations, retry parameters, and well-known file names that are
//! used across multiple modules. Defining them centrally improves
//! maintainability and makes magic numbers more discoverable.

use std::time::Duration;

/// Name of the project manifest file.
pub const MANIFEST_FILENAME: &str = "depkit.toml";

/// Name of the usage-export manifest a fetched dependency may ship for
/// delegated sub-builds.
pub const NESTED_MANIFEST_FILENAME: &str = "depkit-export.toml";

/// Default install root, relative to the manifest directory.
pub const DEFAULT_INSTALL_ROOT: &str = "deps";

/// Overall timeout for a single dependency download (120 seconds).
///
/// Archives are small (header-only libraries), but slow mirrors are common;
/// a hung connection must not block the build indefinitely.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(120);

/// Number of download attempts before a fetch is reported as failed.
///
/// Retries apply to network transfer only. Archive and filesystem failures
/// are never retried.
pub const FETCH_ATTEMPTS: usize = 3;

/// Starting delay for exponential backoff between download attempts (250ms).
pub const STARTING_BACKOFF_DELAY_MS: u64 = 250;

/// Maximum backoff delay between download attempts (4 seconds).
pub const MAX_BACKOFF_DELAY_MS: u64 = 4000;

/// User agent sent with archive downloads.
pub const USER_AGENT: &str = concat!("depkit/", env!("CARGO_PKG_VERSION"));
