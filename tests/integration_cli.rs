//! CLI integration tests
//!
//! These exercise the depkit binary end to end on paths that require no
//! network access: empty manifests, pre-populated install roots (the
//! presence check short-circuits before any download), unknown dependency
//! names, and the required-toolchain configuration abort.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn depkit() -> Command {
    Command::cargo_bin("depkit").unwrap()
}

#[test]
fn test_install_with_no_dependencies_succeeds() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("depkit.toml"), "dependencies = []\n").unwrap();

    depkit()
        .current_dir(project.path())
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed 0 dependencies"));
}

#[test]
fn test_install_without_manifest_fails() {
    let project = TempDir::new().unwrap();

    depkit()
        .current_dir(project.path())
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("depkit.toml not found"));
}

#[test]
fn test_install_unknown_dependency_fails_before_fetching() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("depkit.toml"),
        "dependencies = [\"no-such-library\"]\n",
    )
    .unwrap();

    depkit()
        .current_dir(project.path())
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dependency 'no-such-library'"));
}

#[test]
fn test_install_uses_cache_without_network() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("depkit.toml"),
        "dependencies = [\"asio\"]\n",
    )
    .unwrap();
    // Pre-populate the probe directory: the presence check must
    // short-circuit before any network access.
    fs::create_dir_all(project.path().join("deps/asio-1.10.6/include")).unwrap();

    depkit()
        .current_dir(project.path())
        .args(["install", "--no-progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cached").and(predicate::str::contains("asio")));
}

#[test]
fn test_required_toolchain_aborts_when_nvcc_missing() {
    let project = TempDir::new().unwrap();
    fs::write(
        project.path().join("depkit.toml"),
        "dependencies = []\n\n[toolchain]\nrequired = true\n",
    )
    .unwrap();

    depkit()
        .current_dir(project.path())
        .env("PATH", "")
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nvcc is not installed"));
}

#[test]
fn test_list_available_shows_catalog() {
    depkit()
        .args(["list", "--available"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("asio")
                .and(predicate::str::contains("websocketpp"))
                .and(predicate::str::contains("lua-bindings")),
        );
}

#[test]
fn test_list_shows_installed_directories() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("depkit.toml"), "dependencies = []\n").unwrap();
    fs::create_dir_all(project.path().join("deps/json-master/include")).unwrap();

    depkit()
        .current_dir(project.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("json-master"));
}

#[test]
fn test_toolchain_check_fails_without_nvcc() {
    let project = TempDir::new().unwrap();

    depkit()
        .current_dir(project.path())
        .env("PATH", "")
        .args(["toolchain", "--check"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_manifest_reports_parse_error() {
    let project = TempDir::new().unwrap();
    fs::write(project.path().join("depkit.toml"), "dependencies = \"oops\"\n").unwrap();

    depkit()
        .current_dir(project.path())
        .args(["install", "--no-progress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid manifest"));
}
