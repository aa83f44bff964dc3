//! Shared filesystem fixtures for unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use vc_common::Environment;

/// Create a synthetic environment under `root` with an interpreter stub
/// and an empty site-packages directory. Returns the environment.
pub fn make_env(root: &Path, name: &str, python_dir: &str) -> Environment {
    let env_root = root.join(name);
    fs::create_dir_all(env_root.join("bin")).expect("create bin");
    fs::write(env_root.join("bin/python"), b"#!/bin/sh\n").expect("write interpreter stub");
    fs::create_dir_all(env_root.join("lib").join(python_dir).join("site-packages"))
        .expect("create site-packages");
    Environment::new(name, env_root)
}

/// Create a `<dir_name>` directory inside the environment's
/// site-packages and return its path.
pub fn add_dist_info(env: &Environment, dir_name: &str) -> PathBuf {
    let sp = crate::resolve::site_packages(&env.root, "python").expect("site-packages");
    let dist_info = sp.join(dir_name);
    fs::create_dir_all(&dist_info).expect("create dist-info");
    dist_info
}

/// Create a dist-info directory with a minimal valid METADATA file.
pub fn add_package(env: &Environment, name: &str, version: &str) -> PathBuf {
    let dist_info = add_dist_info(env, &format!("{name}-{version}.dist-info"));
    fs::write(
        dist_info.join("METADATA"),
        format!("Name: {name}\nVersion: {version}\n"),
    )
    .expect("write METADATA");
    dist_info
}
