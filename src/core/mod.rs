//! Core types and error handling for depkit
//!
//! This module contains the error taxonomy shared by the fetcher and
//! toolchain subsystems, along with the user-facing error reporting used by
//! the CLI.
//!
//! # Key Components
//!
//! - [`DepkitError`] - Enumerated error types for all failure cases
//! - [`ErrorContext`] - Wrapper adding user-friendly suggestions and details
//! - [`user_friendly_error`] - Conversion from any [`anyhow::Error`] into a
//!   displayable [`ErrorContext`]
//!
//! Every failure in this subsystem is build-fatal by design: a missing
//! dependency or missing toolchain makes the requested build target
//! unbuildable, so no error is ever downgraded to a warning.

pub mod error;

pub use error::{DepkitError, ErrorContext, user_friendly_error};
