//! Command-line interface for depkit
//!
//! Each command is implemented as a separate module with its own argument
//! structure and execution logic:
//!
//! - `install` - fetch every dependency declared in depkit.toml
//! - `list` - show what is present in the install root
//! - `toolchain` - detect nvcc and print the toolchain registration
//!
//! # Global Options
//!
//! All commands support:
//! - `--verbose` / `--quiet` - logging verbosity
//! - `--manifest-path` - explicit path to depkit.toml instead of walking
//!   parent directories

mod install;
mod list;
mod toolchain;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Main CLI application structure for depkit.
///
/// Handles global flags and delegates to subcommands for specific
/// operations.
#[derive(Parser)]
#[command(
    name = "depkit",
    about = "Fetch build dependencies and integrate the CUDA toolchain",
    version,
    long_about = "depkit keeps a project's third-party C++ dependencies present in a local \
                  install root and describes how to drive nvcc as a secondary toolchain."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging.
    ///
    /// Equivalent to setting `RUST_LOG=debug`. Mutually exclusive with
    /// `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the manifest file (depkit.toml).
    ///
    /// By default, depkit searches for depkit.toml in the current directory
    /// and parent directories.
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,
}

/// Available subcommands for the depkit CLI.
#[derive(Subcommand)]
enum Commands {
    /// Fetch all dependencies declared in the manifest
    Install(install::InstallCommand),
    /// List dependencies present in the install root
    List(list::ListCommand),
    /// Detect nvcc and print the toolchain registration
    Toolchain(toolchain::ToolchainCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Install(cmd) => cmd.execute(self.manifest_path.as_deref()).await,
            Commands::List(cmd) => cmd.execute(self.manifest_path.as_deref()),
            Commands::Toolchain(cmd) => cmd.execute(self.manifest_path.as_deref()),
        }
    }

    fn init_logging(&self) {
        let default_level = if self.verbose {
            "depkit=debug"
        } else if self.quiet {
            "error"
        } else {
            "depkit=info"
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        // A second init (e.g. in-process tests) is harmless.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
    }
}

/// Locate the manifest from an explicit path or by walking parents of the
/// current directory.
pub(crate) fn locate_manifest(explicit: Option<&std::path::Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let cwd = std::env::current_dir()?;
            crate::manifest::Manifest::find(&cwd)
        }
    }
}
