//! Tests for error reporting, suggestions and exit codes.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn config_with_root(tmp: &TempDir, root: &str) -> std::path::PathBuf {
    let path = tmp.path().join("strata.toml");
    fs::write(
        &path,
        format!("[templates]\nroot = {root:?}\n\n[defaults]\ninstall = false\n"),
    )
    .unwrap();
    path
}

#[test]
fn missing_explicit_config_exits_with_configuration_code() {
    let tmp = TempDir::new().unwrap();

    cargo_bin_cmd!("strata")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(tmp.path().join("absent.toml"))
        .arg("extensions")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"))
        .stderr(predicate::str::contains("strata init"));
}

#[test]
fn non_empty_directory_requires_force() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_root(&tmp, "/nonexistent/templates");
    let target = tmp.path().join("taken");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("notes.txt"), "keep me").unwrap();

    cargo_bin_cmd!("strata")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config)
        .arg("new")
        .arg(&target)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is not empty"))
        .stderr(predicate::str::contains("--force"));

    assert_eq!(fs::read_to_string(target.join("notes.txt")).unwrap(), "keep me");
}

#[test]
fn missing_base_template_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let config = config_with_root(&tmp, &tmp.path().join("templates").display().to_string());

    cargo_bin_cmd!("strata")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&config)
        .arg("new")
        .arg(tmp.path().join("app"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("base template not found"));
}

#[test]
fn invalid_exclude_pattern_is_a_configuration_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("strata.toml");
    fs::write(&path, "[scaffold]\nexclude = [\"(\"]\n").unwrap();

    cargo_bin_cmd!("strata")
        .env("NO_COLOR", "1")
        .arg("--config")
        .arg(&path)
        .arg("new")
        .arg(tmp.path().join("app"))
        .assert()
        .code(4)
        .stderr(predicate::str::contains("scaffold.exclude"));
}

#[test]
fn conflicting_install_flags_are_rejected_by_the_parser() {
    cargo_bin_cmd!("strata")
        .args(["new", "app", "--install", "--skip-install"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn verbose_errors_show_the_cause_chain() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("strata.toml");
    fs::write(&path, "[defaults\ninstall = ").unwrap();

    cargo_bin_cmd!("strata")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("-v")
        .arg("--config")
        .arg(&path)
        .arg("extensions")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Caused by:"))
        .stderr(predicate::str::contains("--verbose").not());
}
