//! End-to-end CLI tests for the vc binary.
//!
//! Each test builds a throwaway environments root on disk and drives
//! the binary through its public surface, asserting on stdout payloads
//! and exit behavior.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the vc binary with a hermetic environment.
fn vc() -> Command {
    let mut cmd = Command::cargo_bin("vc").expect("vc binary should exist");
    cmd.env_remove("VC_ENVS_ROOT").env_remove("VC_LOG");
    cmd
}

/// Create `<root>/<name>` with a stub interpreter and a site-packages
/// directory, returning the site-packages path.
fn make_env(root: &Path, name: &str) -> PathBuf {
    let env_root = root.join(name);
    fs::create_dir_all(env_root.join("bin")).expect("mkdir bin");
    fs::write(env_root.join("bin/python"), "").expect("stub interpreter");
    let site = env_root.join("lib/python3.11/site-packages");
    fs::create_dir_all(&site).expect("mkdir site-packages");
    site
}

fn add_package(site: &Path, name: &str, version: &str) {
    let dist_info = site.join(format!("{name}-{version}.dist-info"));
    fs::create_dir_all(&dist_info).expect("mkdir dist-info");
    fs::write(
        dist_info.join("METADATA"),
        format!("Metadata-Version: 2.1\nName: {name}\nVersion: {version}\n"),
    )
    .expect("write METADATA");
}

#[test]
fn list_envs_emits_sorted_json() {
    let tmp = TempDir::new().expect("tempdir");
    make_env(tmp.path(), "zeta");
    make_env(tmp.path(), "alpha");
    // No interpreter, must be filtered out.
    fs::create_dir_all(tmp.path().join("not-an-env")).expect("mkdir");

    let output = vc()
        .args(["list-envs", "--envs-root"])
        .arg(tmp.path())
        .output()
        .expect("run vc");
    assert!(output.status.success());

    let envs: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let names: Vec<&str> = envs
        .as_array()
        .expect("array")
        .iter()
        .map(|e| e["name"].as_str().expect("name"))
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);
}

#[test]
fn scan_turbo_reports_directory_derived_records() {
    let tmp = TempDir::new().expect("tempdir");
    let site = make_env(tmp.path(), "env1");
    add_package(&site, "numpy", "1.26.4");
    add_package(&site, "requests", "2.31.0");

    let output = vc()
        .args(["scan", "--profile", "turbo", "--envs-root"])
        .arg(tmp.path())
        .output()
        .expect("run vc");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["totals"]["environments"], 1);
    assert_eq!(report["totals"]["packages"], 2);

    let env = &report["environments"][0];
    assert_eq!(env["environment"], "env1");
    assert_eq!(env["level"], "l1");
    assert_eq!(env["packages"]["numpy"]["version"], "1.26.4");
}

#[test]
fn scan_forced_level_overrides_profile() {
    let tmp = TempDir::new().expect("tempdir");
    let site = make_env(tmp.path(), "env1");
    add_package(&site, "numpy", "1.26.4");

    let output = vc()
        .args(["scan", "--profile", "turbo", "--level", "l4", "--envs-root"])
        .arg(tmp.path())
        .output()
        .expect("run vc");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["environments"][0]["level"], "l4");
    let record = &report["environments"][0]["packages"]["numpy"];
    assert_eq!(record["source"], "pypi");
    assert_eq!(record["editable"], false);
}

#[test]
fn scan_summary_format_is_line_oriented() {
    let tmp = TempDir::new().expect("tempdir");
    let site = make_env(tmp.path(), "env1");
    add_package(&site, "numpy", "1.26.4");

    vc().args(["scan", "--format", "summary", "--envs-root"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("env1"))
        .stdout(predicate::str::contains("packages=1"))
        .stdout(predicate::str::contains("total"));
}

#[test]
fn missing_envs_root_is_a_config_error() {
    vc().arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration Error"))
        .stderr(predicate::str::contains("VC_ENVS_ROOT"));
}

#[test]
fn envs_root_read_from_environment_variable() {
    let tmp = TempDir::new().expect("tempdir");
    make_env(tmp.path(), "env1");

    vc().arg("list-envs")
        .env("VC_ENVS_ROOT", tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("env1"));
}

#[test]
fn unknown_profile_fails() {
    let tmp = TempDir::new().expect("tempdir");
    vc().args(["scan", "--profile", "warp", "--envs-root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown profile"));
}

#[test]
fn changed_name_must_exist() {
    let tmp = TempDir::new().expect("tempdir");
    make_env(tmp.path(), "env1");

    vc().args(["scan", "--changed", "ghost", "--envs-root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Environment Not Found"));
}

#[test]
fn check_degrades_gracefully_without_pip() {
    let tmp = TempDir::new().expect("tempdir");
    let site = make_env(tmp.path(), "env1");
    add_package(&site, "numpy", "1.26.4");

    // Stub interpreter is not executable, so the oracle degrades to
    // empty and accuracy is marked unavailable rather than failing.
    let output = vc()
        .args(["check", "--oracle-timeout", "2", "--envs-root"])
        .arg(tmp.path())
        .output()
        .expect("run vc");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    let accuracy = &report["environments"][0]["accuracy"];
    assert_eq!(accuracy["oracle_available"], false);
    assert_eq!(accuracy["matched"], 0);
}
