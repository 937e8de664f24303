//! depkit - Build-dependency fetcher and CUDA toolchain integration
//!
//! depkit keeps a C++ project's header-only and source third-party
//! dependencies present in a local install root, and teaches a host build
//! of mixed CPU/GPU code how to drive `nvcc` as a secondary toolchain.
//!
//! # Architecture Overview
//!
//! Two independent patterns cooperate:
//!
//! - **Dependency fetchers**: given a named dependency, an install root, and
//!   a remote archive, ensure the files exist on disk exactly once and
//!   return a [`usage::Usage`] descriptor (include paths, preprocessor
//!   definitions, libraries) that the consuming build merges into a target's
//!   compile/link configuration. Presence of the dependency's directory is
//!   the sole idempotency guard; the install root is a cache keyed by
//!   dependency name and is never invalidated automatically.
//! - **Toolchain integration**: detect `nvcc`, and describe its registration
//!   as an immutable [`toolchain::ToolchainConfig`] value - recognized
//!   source suffix, PTX/static-object/shared-object rules, host-flag
//!   translation, and conditional injection of the CUDA runtime libraries
//!   into link steps whose transitive sources include GPU code.
//!
//! # Core Modules
//!
//! - [`fetcher`] - dependency descriptors, archive retrieval and extraction,
//!   and the built-in dependency catalog
//! - [`toolchain`] - nvcc detection, rule templates, flag translation, and
//!   link-time runtime-library decisions
//! - [`usage`] - the typed usage descriptor and its append-only merge
//! - [`manifest`] - `depkit.toml` parsing and discovery
//! - [`installer`] - orchestration of all declared fetchers with retry and
//!   timeout policy
//! - [`core`] - error types and user-facing error reporting
//!
//! # Manifest Format (depkit.toml)
//!
//! ```toml
//! install-root = "deps"
//! dependencies = ["asio", "json", "websocketpp"]
//!
//! [toolchain]
//! required = true
//! cuda-architecture = "sm_70"
//! ```

// Core functionality modules
pub mod core;
pub mod fetcher;
pub mod installer;
pub mod toolchain;
pub mod usage;

// Project configuration
pub mod manifest;

// Supporting modules
pub mod cli;
pub mod constants;
pub mod utils;
