//! External GPU toolchain integration (nvcc)
//!
//! Registers nvcc as a secondary compiler toolchain: a distinguished source
//! suffix (`.cu`), build rules producing PTX, static-object, and
//! shared-object artifacts, translation of generic host compiler flags into
//! nvcc's `-Xcompiler` dialect, and conditional injection of the CUDA
//! runtime libraries into link steps whose transitive sources include GPU
//! code.
//!
//! Registration is expressed as an immutable [`ToolchainConfig`] value the
//! caller merges into its own configuration store. Nothing here mutates
//! shared state; two targets with different flag sets simply construct
//! commands from different configs.
//!
//! # Submodules
//!
//! - [`flags`] - host-flag wrapping and the disallowed `pedantic` category
//! - [`rules`] - per-artifact command templates
//! - [`link`] - the per-link-step runtime-library decision
//! - [`scanner`] - `#include` scanning so GPU sources join incremental
//!   rebuild tracking

pub mod flags;
pub mod link;
pub mod rules;
pub mod scanner;

pub use link::{LinkInput, needs_toolchain_runtime};
pub use rules::{Rule, RuleKind};
pub use scanner::IncludeScanner;

use crate::core::DepkitError;
use crate::usage::Usage;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The distinguished suffix identifying GPU sources.
pub const GPU_SUFFIX: &str = ".cu";

/// Hardware target used when the caller does not override it.
pub const DEFAULT_ARCHITECTURE: &str = "sm_35";

/// Name of the external compiler binary.
const NVCC: &str = "nvcc";

/// Caller-side options for toolchain registration.
#[derive(Debug, Clone, Default)]
pub struct ToolchainOptions {
    /// Hardware target identifier (`-arch`); `None` selects
    /// [`DEFAULT_ARCHITECTURE`].
    pub cuda_architecture: Option<String>,
    /// Generic host compiler flags, forwarded through the wrapper marker.
    pub host_flags: Vec<String>,
    /// nvcc-dialect flags supplied by the caller; defaults are appended
    /// after these, so caller values are never lost.
    pub nvcc_flags: Vec<String>,
}

impl From<&crate::manifest::ToolchainSection> for ToolchainOptions {
    fn from(section: &crate::manifest::ToolchainSection) -> Self {
        Self {
            cuda_architecture: section.cuda_architecture.clone(),
            host_flags: section.host_flags.clone(),
            nvcc_flags: Vec::new(),
        }
    }
}

/// Presence detection: is the external compiler locatable?
#[must_use]
pub fn exists() -> bool {
    which::which(NVCC).is_ok()
}

/// Immutable registration record for the nvcc toolchain.
///
/// Constructed once at configuration time and never mutated afterwards;
/// callers merge it into their own configuration store. Command
/// construction ([`Rule::command`]) and the link decision
/// ([`ToolchainConfig::link_libraries`]) are computed per call from this
/// value.
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
    program: PathBuf,
    suffix: String,
    nvcc_flags: Vec<String>,
    host_flags: Vec<String>,
    defines: Vec<String>,
    runtime_libraries: Vec<String>,
}

impl ToolchainConfig {
    /// Locate nvcc and build the registration.
    ///
    /// # Errors
    ///
    /// Returns [`DepkitError::ToolchainNotFound`] when nvcc is not on the
    /// PATH. Callers that declared the toolchain required must treat this
    /// as fatal for configuration.
    pub fn generate(options: &ToolchainOptions) -> Result<Self> {
        let program = which::which(NVCC).map_err(|_| DepkitError::ToolchainNotFound)?;
        info!("Registered GPU toolchain at {}", program.display());
        Ok(Self::with_program(program, options))
    }

    /// Build the registration around an already-located compiler binary.
    pub fn with_program(program: PathBuf, options: &ToolchainOptions) -> Self {
        let architecture = options
            .cuda_architecture
            .clone()
            .unwrap_or_else(|| DEFAULT_ARCHITECTURE.to_string());
        debug!("GPU toolchain targeting architecture {architecture}");

        // Caller-supplied flags first; defaults appended, never overwriting.
        let mut nvcc_flags = options.nvcc_flags.clone();
        nvcc_flags.extend([
            "-std=c++11".to_string(),
            "-D_FORCE_INLINES".to_string(),
            format!("-arch={architecture}"),
            "--expt-extended-lambda".to_string(),
            "-m64".to_string(),
        ]);

        Self {
            program,
            suffix: GPU_SUFFIX.to_string(),
            nvcc_flags,
            host_flags: options.host_flags.clone(),
            defines: vec!["CUDA_ENABLED".to_string()],
            runtime_libraries: vec!["cuda".to_string(), "cudart".to_string()],
        }
    }

    /// Path of the external compiler binary.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The distinguished source suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Whether `source` is compiled by this toolchain.
    #[must_use]
    pub fn handles(&self, source: &Path) -> bool {
        LinkInput::Source(source.to_path_buf()).contains_suffix(&self.suffix)
    }

    /// nvcc-dialect flags, caller values first.
    #[must_use]
    pub fn nvcc_flags(&self) -> &[String] {
        &self.nvcc_flags
    }

    /// Untranslated host flags; wrapped per command at render time.
    #[must_use]
    pub fn host_flags(&self) -> &[String] {
        &self.host_flags
    }

    /// Preprocessor definitions every GPU compilation carries.
    #[must_use]
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Runtime libraries injected into GPU-touching link steps.
    #[must_use]
    pub fn runtime_libraries(&self) -> &[String] {
        &self.runtime_libraries
    }

    /// The rules this registration installs for the GPU suffix.
    ///
    /// Every rule shares the include scanner from
    /// [`scanner_for`](Self::scanner_for), so `#include` references in GPU
    /// sources are tracked for incremental rebuilds exactly like host
    /// sources.
    #[must_use]
    pub fn rules(&self) -> Vec<Rule> {
        vec![
            Rule {
                kind: RuleKind::Ptx,
                src_suffix: self.suffix.clone(),
                target_suffix: ".ptx".to_string(),
                on_demand: true,
            },
            Rule {
                kind: RuleKind::StaticObject,
                src_suffix: self.suffix.clone(),
                target_suffix: ".o".to_string(),
                on_demand: false,
            },
            Rule {
                kind: RuleKind::SharedObject,
                src_suffix: self.suffix.clone(),
                target_suffix: ".os".to_string(),
                on_demand: false,
            },
        ]
    }

    /// Include scanner for GPU sources, resolving against the target's
    /// usage paths.
    #[must_use]
    pub fn scanner_for(&self, usage: &Usage) -> IncludeScanner {
        let mut paths = usage.include_paths.clone();
        paths.extend(usage.system_include_paths.iter().cloned());
        IncludeScanner::new(paths)
    }

    /// Libraries to append to a link command, decided per link step.
    ///
    /// Returns the runtime libraries iff some transitive input carries the
    /// GPU suffix; an empty list otherwise. Never cached: different link
    /// targets mix toolchain usage differently.
    #[must_use]
    pub fn link_libraries(&self, inputs: &[LinkInput]) -> Vec<String> {
        if needs_toolchain_runtime(inputs, &self.suffix) {
            self.runtime_libraries.clone()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(options: ToolchainOptions) -> ToolchainConfig {
        ToolchainConfig::with_program(PathBuf::from("nvcc"), &options)
    }

    #[test]
    fn test_default_architecture_applies_when_unset() {
        let config = config_with(ToolchainOptions::default());
        assert!(config.nvcc_flags().contains(&"-arch=sm_35".to_string()));
    }

    #[test]
    fn test_caller_architecture_overrides_default() {
        let config = config_with(ToolchainOptions {
            cuda_architecture: Some("sm_70".to_string()),
            ..Default::default()
        });
        assert!(config.nvcc_flags().contains(&"-arch=sm_70".to_string()));
        assert!(!config.nvcc_flags().contains(&"-arch=sm_35".to_string()));
    }

    #[test]
    fn test_caller_nvcc_flags_precede_appended_defaults() {
        let config = config_with(ToolchainOptions {
            nvcc_flags: vec!["--use_fast_math".to_string()],
            ..Default::default()
        });
        let flags = config.nvcc_flags();
        assert_eq!(flags[0], "--use_fast_math");
        assert!(flags.contains(&"-std=c++11".to_string()));
        assert!(flags.contains(&"--expt-extended-lambda".to_string()));
        assert!(flags.contains(&"-m64".to_string()));
        assert!(flags.contains(&"-D_FORCE_INLINES".to_string()));
    }

    #[test]
    fn test_handles_only_gpu_suffix() {
        let config = config_with(ToolchainOptions::default());
        assert!(config.handles(Path::new("kernels.cu")));
        assert!(!config.handles(Path::new("main.cpp")));
        assert!(!config.handles(Path::new("header.cuh")));
    }

    #[test]
    fn test_link_libraries_conditional_on_inputs() {
        let config = config_with(ToolchainOptions::default());

        let gpu = vec![
            LinkInput::Source(PathBuf::from("a.cpp")),
            LinkInput::Source(PathBuf::from("b.cu")),
        ];
        assert_eq!(config.link_libraries(&gpu), vec!["cuda", "cudart"]);

        let host_only = vec![
            LinkInput::Source(PathBuf::from("a.cpp")),
            LinkInput::Source(PathBuf::from("b.cpp")),
        ];
        assert!(config.link_libraries(&host_only).is_empty());

        let via_static_lib = vec![LinkInput::StaticLib {
            name: "kernels".to_string(),
            inputs: vec![LinkInput::Source(PathBuf::from("c.cu"))],
        }];
        assert_eq!(config.link_libraries(&via_static_lib), vec!["cuda", "cudart"]);
    }

    #[test]
    fn test_config_carries_cuda_define() {
        let config = config_with(ToolchainOptions::default());
        assert_eq!(config.defines(), ["CUDA_ENABLED"]);
    }
}
