//! Build-rule templates for GPU sources
//!
//! Three rules are registered for the distinguished `.cu` suffix: a PTX
//! rule producing the intermediate representation (not part of the default
//! compile set - invoked only on demand), and static-object and
//! shared-object rules mirroring the primary compiler's object builders.
//! Each rule renders its full command line on request; host-flag
//! translation happens at render time, so flags appended to the
//! configuration after registration are picked up.

use crate::toolchain::ToolchainConfig;
use crate::toolchain::flags::wrap_host_flags;
use crate::usage::Usage;
use std::path::Path;

/// The artifact kind a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// PTX intermediate representation, built on demand.
    Ptx,
    /// Object linkable into static targets.
    StaticObject,
    /// Object linkable into shared targets.
    SharedObject,
}

/// A registered build rule for the GPU suffix.
#[derive(Debug, Clone)]
pub struct Rule {
    /// What this rule produces.
    pub kind: RuleKind,
    /// Source suffix the rule accepts.
    pub src_suffix: String,
    /// Suffix of the produced artifact.
    pub target_suffix: String,
    /// Whether the rule participates in the default compile dispatch or is
    /// invoked only when its output is named explicitly.
    pub on_demand: bool,
}

impl Rule {
    /// Render the complete command line for compiling `source` to `target`.
    ///
    /// Flag translation is recomputed here on every call rather than cached
    /// at registration: the host-flag set may have grown since the config
    /// was created, and the usage descriptor differs per target.
    #[must_use]
    pub fn command(
        &self,
        config: &ToolchainConfig,
        source: &Path,
        target: &Path,
        usage: &Usage,
    ) -> Vec<String> {
        let mut cmd = vec![config.program().display().to_string()];

        match self.kind {
            RuleKind::Ptx => cmd.push("-ptx".to_string()),
            RuleKind::StaticObject | RuleKind::SharedObject => cmd.push("-c".to_string()),
        }

        cmd.extend(config.nvcc_flags().iter().cloned());
        if self.kind == RuleKind::SharedObject {
            cmd.push("-shared".to_string());
        }

        cmd.extend(wrap_host_flags(config.host_flags()));

        for define in config.defines() {
            cmd.push(format!("-D{define}"));
        }
        cmd.extend(usage.compile_flags());

        cmd.push(source.display().to_string());
        cmd.push("-o".to_string());
        cmd.push(target.display().to_string());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::{ToolchainConfig, ToolchainOptions};
    use std::path::PathBuf;

    fn test_config(options: ToolchainOptions) -> ToolchainConfig {
        ToolchainConfig::with_program(PathBuf::from("nvcc"), &options)
    }

    #[test]
    fn test_registered_rules_cover_all_artifact_kinds() {
        let config = test_config(ToolchainOptions::default());
        let rules = config.rules();

        assert_eq!(rules.len(), 3);
        for rule in &rules {
            assert_eq!(rule.src_suffix, ".cu");
        }
        let ptx = rules.iter().find(|r| r.kind == RuleKind::Ptx).unwrap();
        assert!(ptx.on_demand);
        assert_eq!(ptx.target_suffix, ".ptx");

        let object = rules.iter().find(|r| r.kind == RuleKind::StaticObject).unwrap();
        assert!(!object.on_demand);
    }

    #[test]
    fn test_static_object_command_shape() {
        let options = ToolchainOptions {
            host_flags: vec!["-Wall".to_string(), "-pedantic".to_string()],
            ..Default::default()
        };
        let config = test_config(options);
        let rule = config
            .rules()
            .into_iter()
            .find(|r| r.kind == RuleKind::StaticObject)
            .unwrap();

        let usage = Usage::new().with_define("ASIO_STANDALONE");
        let cmd = rule.command(
            &config,
            Path::new("kernels.cu"),
            Path::new("kernels.o"),
            &usage,
        );

        let rendered = cmd.join(" ");
        assert!(rendered.starts_with("nvcc -c"));
        assert!(rendered.contains("-Xcompiler -Wall"));
        assert!(!rendered.contains("pedantic"));
        assert!(rendered.contains("-DCUDA_ENABLED"));
        assert!(rendered.contains("-DASIO_STANDALONE"));
        assert!(rendered.ends_with("kernels.cu -o kernels.o"));
    }

    #[test]
    fn test_shared_object_command_adds_shared() {
        let config = test_config(ToolchainOptions::default());
        let rule = config
            .rules()
            .into_iter()
            .find(|r| r.kind == RuleKind::SharedObject)
            .unwrap();

        let cmd = rule.command(
            &config,
            Path::new("kernels.cu"),
            Path::new("kernels.os"),
            &Usage::new(),
        );
        assert!(cmd.contains(&"-shared".to_string()));
    }

    #[test]
    fn test_ptx_command_uses_ptx_mode() {
        let config = test_config(ToolchainOptions::default());
        let rule = config.rules().into_iter().find(|r| r.kind == RuleKind::Ptx).unwrap();

        let cmd = rule.command(
            &config,
            Path::new("kernels.cu"),
            Path::new("kernels.ptx"),
            &Usage::new(),
        );
        assert_eq!(cmd[1], "-ptx");
        assert!(!cmd.contains(&"-c".to_string()));
    }

    #[test]
    fn test_flag_translation_is_lazy() {
        // The same rule renders different commands when the config's host
        // flags differ, rather than baking flags in at registration time.
        let quiet = test_config(ToolchainOptions::default());
        let noisy = test_config(ToolchainOptions {
            host_flags: vec!["-Wextra".to_string()],
            ..Default::default()
        });

        let rule = quiet
            .rules()
            .into_iter()
            .find(|r| r.kind == RuleKind::StaticObject)
            .unwrap();
        let before = rule.command(&quiet, Path::new("k.cu"), Path::new("k.o"), &Usage::new());
        let after = rule.command(&noisy, Path::new("k.cu"), Path::new("k.o"), &Usage::new());

        assert!(!before.contains(&"-Wextra".to_string()));
        assert!(after.contains(&"-Wextra".to_string()));
    }
}
