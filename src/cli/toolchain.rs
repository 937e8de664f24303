//! Toolchain command implementation
//!
//! Detects nvcc and prints the registration the integrator would install:
//! recognized suffix, rules, flag defaults, and runtime libraries.

use crate::core::DepkitError;
use crate::manifest::Manifest;
use crate::toolchain::{self, ToolchainConfig, ToolchainOptions};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

/// Arguments for the toolchain command.
#[derive(Args)]
pub struct ToolchainCommand {
    /// Exit non-zero when nvcc is not locatable, printing nothing.
    #[arg(long)]
    check: bool,
}

impl ToolchainCommand {
    /// Execute the toolchain command.
    pub fn execute(self, manifest_path: Option<&Path>) -> Result<()> {
        // Manifest is optional here: toolchain options fall back to
        // defaults when no project is in scope.
        let options = match super::locate_manifest(manifest_path) {
            Ok(path) => ToolchainOptions::from(&Manifest::load(&path)?.toolchain),
            Err(_) => ToolchainOptions::default(),
        };

        if self.check {
            return if toolchain::exists() {
                Ok(())
            } else {
                Err(DepkitError::ToolchainNotFound.into())
            };
        }

        if !toolchain::exists() {
            println!("{}: nvcc not found in PATH", "toolchain".yellow().bold());
            return Ok(());
        }

        let config = ToolchainConfig::generate(&options)?;
        println!("{}: {}", "program".bold(), config.program().display());
        println!("{}: {}", "suffix".bold(), config.suffix());
        println!("{}: {}", "flags".bold(), config.nvcc_flags().join(" "));
        println!("{}: {}", "defines".bold(), config.defines().join(" "));
        println!(
            "{}: {}",
            "runtime libraries".bold(),
            config.runtime_libraries().join(" ")
        );
        println!("{}:", "rules".bold());
        for rule in config.rules() {
            let dispatch = if rule.on_demand {
                "on demand"
            } else {
                "default compile set"
            };
            println!(
                "  {:?}: {} -> {} ({dispatch})",
                rule.kind, rule.src_suffix, rule.target_suffix
            );
        }
        Ok(())
    }
}
