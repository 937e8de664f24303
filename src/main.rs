//! depkit CLI entry point
//!
//! This is the main executable for depkit. It handles command-line argument
//! parsing, error display, and command execution.
//!
//! The CLI supports commands for managing build dependencies:
//! - `install` - Fetch all dependencies declared in depkit.toml
//! - `list` - List dependencies present in the install root
//! - `toolchain` - Detect nvcc and print the toolchain registration

use anyhow::Result;
use clap::Parser;
use depkit::cli;
use depkit::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // Execute the command
    match cli.execute().await {
        Ok(_) => Ok(()),
        Err(e) => {
            // Convert to user-friendly error with context and suggestions
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
