//! List command implementation
//!
//! Shows the dependencies present in the install root (the durable cache),
//! or the registered catalog with `--available`.

use crate::fetcher::FetcherRegistry;
use crate::manifest::Manifest;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;
use walkdir::WalkDir;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListCommand {
    /// List the registered dependency catalog instead of the install root.
    #[arg(long)]
    available: bool,

    /// Include per-dependency file counts.
    #[arg(long)]
    details: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, manifest_path: Option<&Path>) -> Result<()> {
        let registry = FetcherRegistry::with_builtins();

        if self.available {
            for name in registry.names() {
                let descriptor = registry.get(name).expect("name came from the registry");
                println!("{} - {}", name.bold(), descriptor.url);
            }
            return Ok(());
        }

        let manifest_path = super::locate_manifest(manifest_path)?;
        let manifest = Manifest::load(&manifest_path)?;
        let install_root = manifest.install_root_for(&manifest_path);

        if !install_root.is_dir() {
            println!("Install root {} does not exist yet", install_root.display());
            return Ok(());
        }

        let mut entries: Vec<_> = std::fs::read_dir(&install_root)?
            .filter_map(Result::ok)
            .filter(|e| e.path().is_dir())
            .collect();
        entries.sort_by_key(std::fs::DirEntry::file_name);

        for entry in entries {
            let name = entry.file_name();
            if self.details {
                let files = WalkDir::new(entry.path())
                    .into_iter()
                    .filter_map(Result::ok)
                    .filter(|e| e.file_type().is_file())
                    .count();
                println!("{} ({files} files)", name.to_string_lossy().bold());
            } else {
                println!("{}", name.to_string_lossy());
            }
        }
        Ok(())
    }
}
