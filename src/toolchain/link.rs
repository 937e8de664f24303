//! Conditional link-flag injection
//!
//! A link step needs the CUDA runtime libraries exactly when some
//! transitive source input carries the distinguished GPU suffix. A static
//! library counts as "containing" the suffix when any of *its* inputs do,
//! so the walk recurses through library inputs rather than inspecting only
//! the link step's immediate sources. The decision is recomputed per link
//! step - different targets mix toolchain usage differently, so it is never
//! cached globally.

use std::path::PathBuf;

/// One input to a link step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkInput {
    /// A source file compiled directly into the link target.
    Source(PathBuf),
    /// A static library, carrying the inputs it was built from.
    StaticLib {
        /// Library name, for diagnostics.
        name: String,
        /// The inputs the library was built from.
        inputs: Vec<LinkInput>,
    },
}

impl LinkInput {
    /// Whether this input, transitively, includes a file with `suffix`.
    #[must_use]
    pub fn contains_suffix(&self, suffix: &str) -> bool {
        match self {
            Self::Source(path) => {
                path.extension().and_then(|e| e.to_str()).is_some_and(|e| {
                    suffix.strip_prefix('.').is_some_and(|wanted| e == wanted)
                })
            }
            Self::StaticLib {
                inputs, ..
            } => inputs.iter().any(|input| input.contains_suffix(suffix)),
        }
    }
}

/// Whether any input in a link step's transitive source set carries
/// `suffix`.
#[must_use]
pub fn needs_toolchain_runtime(inputs: &[LinkInput], suffix: &str) -> bool {
    inputs.iter().any(|input| input.contains_suffix(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(path: &str) -> LinkInput {
        LinkInput::Source(PathBuf::from(path))
    }

    #[test]
    fn test_mixed_sources_need_runtime() {
        let inputs = vec![src("a.cpp"), src("b.cu")];
        assert!(needs_toolchain_runtime(&inputs, ".cu"));
    }

    #[test]
    fn test_host_only_sources_do_not() {
        let inputs = vec![src("a.cpp"), src("b.cpp")];
        assert!(!needs_toolchain_runtime(&inputs, ".cu"));
    }

    #[test]
    fn test_static_library_is_walked_transitively() {
        let inputs = vec![
            src("main.cpp"),
            LinkInput::StaticLib {
                name: "kernels".to_string(),
                inputs: vec![src("c.cu")],
            },
        ];
        assert!(needs_toolchain_runtime(&inputs, ".cu"));
    }

    #[test]
    fn test_nested_static_libraries() {
        let inputs = vec![LinkInput::StaticLib {
            name: "outer".to_string(),
            inputs: vec![LinkInput::StaticLib {
                name: "inner".to_string(),
                inputs: vec![src("deep.cu")],
            }],
        }];
        assert!(needs_toolchain_runtime(&inputs, ".cu"));
    }

    #[test]
    fn test_suffix_must_match_exactly() {
        // ".cuh" headers and ".c" sources are not the distinguished suffix.
        let inputs = vec![src("k.cuh"), src("c.c")];
        assert!(!needs_toolchain_runtime(&inputs, ".cu"));
    }
}
