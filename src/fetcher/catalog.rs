//! Built-in dependency catalog
//!
//! Descriptors for the third-party libraries the host project consumes:
//! networking primitives (asio), JSON parsing (nlohmann/json), CLI parsing
//! (CLI11, one-header), the WebSocket protocol implementation
//! (websocketpp), an embedded web server (eweb), and the Lua binding layer
//! (lua-bindings, which ships its own nested build).
//!
//! Probe directories deliberately match what each archive unpacks into, so
//! a previously-populated install root is recognized without any network
//! access. Only lua-bindings normalizes its directory name; its include
//! paths are consumed by project headers and must not encode a version
//! label.

use crate::fetcher::{DependencyDescriptor, MemberFilter, Payload, Rename};
use crate::usage::Usage;
use std::path::PathBuf;

/// Descriptors for every built-in dependency.
#[must_use]
pub fn builtin_descriptors() -> Vec<DependencyDescriptor> {
    vec![asio(), json(), cli11(), websocketpp(), eweb(), lua_bindings()]
}

/// Standalone asio: header-only networking primitives.
fn asio() -> DependencyDescriptor {
    DependencyDescriptor {
        name: "asio".to_string(),
        url: "https://downloads.sourceforge.net/project/asio/asio/1.10.6%20%28Stable%29/asio-1.10.6.zip"
            .to_string(),
        probe_dir: "asio-1.10.6/include".to_string(),
        payload: Payload::Archive {
            filter: MemberFilter::contains_any(["include", "LICENSE"]),
            rename: None,
        },
        requires: Vec::new(),
        own_usage: Usage::new()
            .with_system_include(PathBuf::from("asio-1.10.6/include"))
            .with_define("ASIO_STANDALONE"),
        sub_build: None,
    }
}

/// nlohmann/json: header-only JSON parsing.
fn json() -> DependencyDescriptor {
    DependencyDescriptor {
        name: "json".to_string(),
        url: "https://github.com/nlohmann/json/archive/master.zip".to_string(),
        probe_dir: "json-master/include".to_string(),
        payload: Payload::Archive {
            filter: MemberFilter::contains_any(["include", "LICENSE"]),
            rename: None,
        },
        requires: Vec::new(),
        own_usage: Usage::new().with_system_include(PathBuf::from("json-master/include")),
        sub_build: None,
    }
}

/// CLI11: single-header CLI parsing, downloaded as one file.
fn cli11() -> DependencyDescriptor {
    DependencyDescriptor {
        name: "cli11".to_string(),
        url: "https://github.com/CLIUtils/CLI11/releases/download/v1.1.0/CLI11.hpp".to_string(),
        probe_dir: "CLI11".to_string(),
        payload: Payload::SingleFile {
            file_name: "CLI11.hpp".to_string(),
        },
        requires: Vec::new(),
        own_usage: Usage::new().with_system_include(PathBuf::from("CLI11")),
        sub_build: None,
    }
}

/// websocketpp: WebSocket protocol implementation on top of asio.
fn websocketpp() -> DependencyDescriptor {
    DependencyDescriptor {
        name: "websocketpp".to_string(),
        url: "https://github.com/zaphoyd/websocketpp/archive/master.zip".to_string(),
        probe_dir: "websocketpp-master".to_string(),
        payload: Payload::Archive {
            filter: MemberFilter::contains_any(["websocketpp-master/websocketpp/", "COPYING"]),
            rename: None,
        },
        requires: vec!["asio".to_string()],
        own_usage: Usage::new().with_system_include(PathBuf::from("websocketpp-master")),
        sub_build: None,
    }
}

/// eweb: embedded web server headers on top of asio.
///
/// Installed as ordinary include paths rather than system includes; the
/// project treats eweb warnings as its own.
fn eweb() -> DependencyDescriptor {
    DependencyDescriptor {
        name: "eweb".to_string(),
        url: "https://github.com/Lunderberg/eweb/archive/master.zip".to_string(),
        probe_dir: "eweb-master/include".to_string(),
        payload: Payload::Archive {
            filter: MemberFilter::contains_any(["eweb-master/include/"]),
            rename: None,
        },
        requires: vec!["asio".to_string()],
        own_usage: Usage::new().with_include(PathBuf::from("eweb-master/include")),
        sub_build: None,
    }
}

/// lua-bindings: Lua binding layer with a nested build of its own.
fn lua_bindings() -> DependencyDescriptor {
    DependencyDescriptor {
        name: "lua-bindings".to_string(),
        url: "https://github.com/Lunderberg/lua-bindings/archive/master.zip".to_string(),
        probe_dir: "lua-bindings/include/lua-bindings".to_string(),
        payload: Payload::Archive {
            filter: MemberFilter::excludes_all(["/tests/", "/doc/"]),
            rename: Some(Rename {
                from: "lua-bindings-master".to_string(),
                to: "lua-bindings".to_string(),
            }),
        },
        requires: Vec::new(),
        own_usage: Usage::new(),
        sub_build: Some("lua-bindings/depkit-export.toml".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names_are_unique() {
        let descriptors = builtin_descriptors();
        let mut names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        let len = names.len();
        names.dedup();
        assert_eq!(names.len(), len);
    }

    #[test]
    fn test_protocol_libraries_require_asio() {
        let descriptors = builtin_descriptors();
        for name in ["websocketpp", "eweb"] {
            let descriptor = descriptors.iter().find(|d| d.name == name).unwrap();
            assert_eq!(descriptor.requires, vec!["asio"]);
        }
    }

    #[test]
    fn test_asio_filter_selects_headers_and_license() {
        let descriptors = builtin_descriptors();
        let asio = descriptors.iter().find(|d| d.name == "asio").unwrap();
        let Payload::Archive {
            filter,
            ..
        } = &asio.payload
        else {
            panic!("asio should be an archive payload");
        };
        assert!(filter.matches("asio-1.10.6/include/asio.hpp"));
        assert!(filter.matches("asio-1.10.6/LICENSE_1_0.txt"));
        assert!(!filter.matches("asio-1.10.6/src/examples/chat_client.cpp"));
    }

    #[test]
    fn test_lua_bindings_normalizes_versioned_name() {
        let descriptors = builtin_descriptors();
        let lua = descriptors.iter().find(|d| d.name == "lua-bindings").unwrap();
        let Payload::Archive {
            rename,
            ..
        } = &lua.payload
        else {
            panic!("lua-bindings should be an archive payload");
        };
        let rename = rename.as_ref().unwrap();
        assert_eq!(rename.from, "lua-bindings-master");
        assert_eq!(rename.to, "lua-bindings");
        assert!(lua.sub_build.is_some());
    }

    #[test]
    fn test_only_eweb_uses_ordinary_include_paths() {
        for descriptor in builtin_descriptors() {
            if descriptor.name == "eweb" {
                assert!(!descriptor.own_usage.include_paths.is_empty());
                assert!(descriptor.own_usage.system_include_paths.is_empty());
            } else {
                assert!(descriptor.own_usage.include_paths.is_empty());
            }
        }
    }
}
