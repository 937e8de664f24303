//! Error handling for depkit
//!
//! This module provides the error types and user-friendly error reporting
//! for depkit. The error system is designed around two core principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Toolchain**: [`DepkitError::ToolchainNotFound`] - the external
//!   compiler is required but not locatable; aborts configuration.
//! - **Fetch**: [`DepkitError::FetchFailed`], [`DepkitError::ArchiveError`] -
//!   network or archive failure during dependency retrieval; aborts the
//!   triggering install, never retried past the orchestrator's policy.
//! - **File System**: [`DepkitError::FileSystemError`],
//!   [`DepkitError::IoError`] - directory creation, extraction, or rename
//!   failure.
//! - **Configuration**: [`DepkitError::ManifestNotFound`],
//!   [`DepkitError::ManifestParseError`], [`DepkitError::TomlError`].
//! - **Dependencies**: [`DepkitError::DependencyNotFound`],
//!   [`DepkitError::SubBuildFailed`].
//!
//! No error is ever downgraded to a warning; every failure here is
//! build-fatal, since a missing dependency or toolchain makes the dependent
//! build target unbuildable.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for depkit operations
///
/// Each variant represents a specific failure mode and carries the details
/// (dependency name, URL, path) needed to report it usefully.
#[derive(Error, Debug)]
pub enum DepkitError {
    /// The external GPU compiler is required by the manifest but was not
    /// found on the PATH. Fatal at configuration time.
    #[error("nvcc is not installed or not found in PATH")]
    ToolchainNotFound,

    /// Network failure while downloading a dependency archive.
    #[error("failed to fetch dependency '{name}' from {url}")]
    FetchFailed {
        /// Canonical dependency name
        name: String,
        /// Archive URL that failed
        url: String,
        /// Underlying transfer error
        reason: String,
    },

    /// The downloaded bytes could not be opened or read as an archive.
    #[error("malformed archive for dependency '{name}': {reason}")]
    ArchiveError {
        /// Canonical dependency name
        name: String,
        /// Underlying archive error
        reason: String,
    },

    /// An archive entry escapes the install root (path traversal).
    #[error("archive entry '{entry}' in dependency '{name}' escapes the install root")]
    UnsafeArchiveEntry {
        /// Canonical dependency name
        name: String,
        /// Offending entry name
        entry: String,
    },

    /// Directory creation, extraction, or rename failure.
    #[error("file system error during {operation}: {path}")]
    FileSystemError {
        /// Operation that failed (e.g. "extraction", "rename")
        operation: String,
        /// Path involved in the failure
        path: String,
    },

    /// Manifest file depkit.toml not found in the current directory or any
    /// parent directory.
    #[error("manifest file depkit.toml not found in current directory or any parent directory")]
    ManifestNotFound,

    /// Invalid manifest syntax or content.
    #[error("invalid manifest file {file}")]
    ManifestParseError {
        /// Path to the manifest that failed to parse
        file: String,
        /// Parse failure detail
        reason: String,
    },

    /// A dependency name in the manifest has no registered fetcher.
    #[error("unknown dependency '{name}'")]
    DependencyNotFound {
        /// The unrecognized name
        name: String,
        /// Closest registered name, if any
        closest: Option<String>,
    },

    /// A delegated sub-build of a fetched dependency failed.
    #[error("sub-build of dependency '{name}' failed: {reason}")]
    SubBuildFailed {
        /// Canonical dependency name
        name: String,
        /// Failure detail from the nested build
        reason: String,
    },

    /// IO errors from [`std::io::Error`]
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing errors from [`toml::de::Error`]
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

/// Wrapper that adds user-friendly messages and suggestions to an error
///
/// Suggestions are actionable steps displayed in green; details explain why
/// the error occurred and are displayed in yellow.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying depkit error
    pub error: DepkitError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`DepkitError`]
    #[must_use]
    pub const fn new(error: DepkitError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable
/// suggestions
///
/// This function is the main entry point for converting arbitrary errors
/// into user-friendly messages for CLI display. It recognizes
/// [`DepkitError`] variants and [`std::io::Error`] kinds and attaches
/// tailored suggestions; anything else is wrapped verbatim.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(ctx) = error.downcast_ref::<DepkitError>() {
        return contextualize(ctx, &error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(DepkitError::FileSystemError {
                operation: "file access".to_string(),
                path: "unknown".to_string(),
            })
            .with_suggestion("Check file ownership of the install root, or run with elevated permissions")
            .with_details("depkit does not have permission to read or write the install root");
        }
    }

    ErrorContext::new(DepkitError::Other {
        message: format!("{error:#}"),
    })
}

fn contextualize(error: &DepkitError, original: &anyhow::Error) -> ErrorContext {
    let rebuilt = DepkitError::Other {
        message: format!("{original:#}"),
    };

    match error {
        DepkitError::ToolchainNotFound => ErrorContext::new(DepkitError::ToolchainNotFound)
            .with_suggestion(
                "Install the CUDA toolkit, or set [toolchain] required = false in depkit.toml",
            )
            .with_details("GPU sources (.cu) cannot be compiled without nvcc on the PATH"),
        DepkitError::FetchFailed {
            name,
            url,
            reason,
        } => ErrorContext::new(DepkitError::FetchFailed {
            name: name.clone(),
            url: url.clone(),
            reason: reason.clone(),
        })
        .with_suggestion("Check network connectivity and that the archive URL is still reachable")
        .with_details(format!("Transfer failed after retries: {reason}")),
        DepkitError::ManifestNotFound => ErrorContext::new(DepkitError::ManifestNotFound)
            .with_suggestion("Create a depkit.toml in your project directory")
            .with_details("depkit searches for depkit.toml in the current and parent directories"),
        DepkitError::DependencyNotFound {
            name,
            closest,
        } => {
            let ctx = ErrorContext::new(DepkitError::DependencyNotFound {
                name: name.clone(),
                closest: closest.clone(),
            });
            match closest {
                Some(candidate) => ctx.with_suggestion(format!("Did you mean '{candidate}'?")),
                None => ctx.with_suggestion("Run 'depkit list --available' for known dependencies"),
            }
        }
        _ => ErrorContext::new(rebuilt),
    }
}
