//! Install command implementation
//!
//! Loads the manifest, verifies the toolchain requirement, and drives the
//! installer for every declared dependency (or a single one with `--only`).

use crate::core::DepkitError;
use crate::fetcher::FetcherRegistry;
use crate::installer;
use crate::manifest::Manifest;
use crate::toolchain;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Arguments for the install command.
#[derive(Args)]
pub struct InstallCommand {
    /// Install only the named dependency (and its requirements).
    #[arg(long)]
    only: Option<String>,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,
}

impl InstallCommand {
    /// Execute the install command.
    pub async fn execute(self, manifest_path: Option<&Path>) -> Result<()> {
        let manifest_path = super::locate_manifest(manifest_path)?;
        let manifest = Manifest::load(&manifest_path)?;

        // A required toolchain that cannot be located aborts configuration
        // before any fetch happens.
        if manifest.toolchain.required && !toolchain::exists() {
            return Err(DepkitError::ToolchainNotFound.into());
        }

        let mut manifest = manifest;
        if let Some(only) = self.only {
            debug!("Restricting install to '{only}'");
            manifest.dependencies = vec![only];
        }

        let registry = FetcherRegistry::with_builtins();
        for name in &manifest.dependencies {
            if registry.get(name).is_none() {
                // Surface unknown names before starting any downloads.
                return Err(DepkitError::DependencyNotFound {
                    name: name.clone(),
                    closest: None,
                }
                .into());
            }
        }

        let spinner = if self.no_progress {
            ProgressBar::hidden()
        } else {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}").expect("static template is valid"),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!(
                "Installing {} dependencies...",
                manifest.dependencies.len()
            ));
            spinner
        };

        let result = installer::install_all(&manifest, &manifest_path, &registry).await;
        spinner.finish_and_clear();
        let report = result?;

        for dep in &report.dependencies {
            let status = if dep.fetched {
                "fetched".green()
            } else {
                "cached".cyan()
            };
            println!("  {} {}", status, dep.name);
        }
        println!(
            "{} {} dependencies ({} fetched, {} cached)",
            "Installed".green().bold(),
            report.dependencies.len(),
            report.fetched_count(),
            report.dependencies.len() - report.fetched_count()
        );
        Ok(())
    }
}
