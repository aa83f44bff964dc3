//! Site-packages resolution and environment discovery.
//!
//! Resolution is deliberately forgiving: a missing `lib` directory or an
//! environment without a matching interpreter folder is a normal
//! "nothing to scan" state, never an error. Discovery of the
//! environments root itself does surface errors, since an unreadable
//! root means the whole run is misconfigured.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use vc_common::{Environment, Error, Result};
use vc_config::ScanConfig;

/// Locate the site-packages directory for an environment root.
///
/// Searches `<root>/lib` for the first subdirectory whose name starts
/// with the interpreter prefix (e.g. `python3.11`) and that contains a
/// `site-packages` child. Returns `None` when the lib directory is
/// absent or no candidate matches.
pub fn site_packages(env_root: &Path, interpreter_prefix: &str) -> Option<PathBuf> {
    let lib = env_root.join("lib");
    let entries = fs::read_dir(&lib).ok()?;

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !name.starts_with(interpreter_prefix) {
            continue;
        }
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let sp = path.join("site-packages");
        if sp.exists() {
            return Some(sp);
        }
    }

    debug!(root = %env_root.display(), "no site-packages found");
    None
}

/// Discover scannable environments under the configured root.
///
/// An environment is a direct subdirectory whose `bin/python` exists.
/// Results are sorted by name for stable output.
pub fn discover_environments(config: &ScanConfig) -> Result<Vec<Environment>> {
    let entries = fs::read_dir(&config.envs_root).map_err(|e| Error::Discovery {
        root: config.envs_root.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut environments = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let env = Environment::new(name, path);
        if env.has_interpreter() {
            environments.push(env);
        }
    }

    environments.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = environments.len(), root = %config.envs_root.display(), "discovered environments");
    Ok(environments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::make_env;
    use tempfile::TempDir;

    #[test]
    fn test_site_packages_found() {
        let tmp = TempDir::new().expect("tempdir");
        let env = make_env(tmp.path(), "athena", "python3.11");

        let sp = site_packages(&env.root, "python").expect("site-packages");
        assert!(sp.ends_with("lib/python3.11/site-packages"));
    }

    #[test]
    fn test_site_packages_missing_lib_is_none() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join("bare");
        fs::create_dir_all(&root).expect("mkdir");
        assert_eq!(site_packages(&root, "python"), None);
    }

    #[test]
    fn test_site_packages_requires_prefix_match() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join("ruby-env");
        fs::create_dir_all(root.join("lib/ruby3.2/site-packages")).expect("mkdir");
        assert_eq!(site_packages(&root, "python"), None);
        assert!(site_packages(&root, "ruby").is_some());
    }

    #[test]
    fn test_site_packages_requires_site_packages_child() {
        let tmp = TempDir::new().expect("tempdir");
        let root = tmp.path().join("empty-env");
        fs::create_dir_all(root.join("lib/python3.11")).expect("mkdir");
        assert_eq!(site_packages(&root, "python"), None);
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let tmp = TempDir::new().expect("tempdir");
        make_env(tmp.path(), "zeta", "python3.11");
        make_env(tmp.path(), "alpha", "python3.12");
        // Directory without an interpreter is not an environment.
        fs::create_dir_all(tmp.path().join("scratch")).expect("mkdir");
        // Stray file is ignored.
        fs::write(tmp.path().join("README"), b"not an env").expect("write");

        let config = ScanConfig::new(tmp.path());
        let envs = discover_environments(&config).expect("discover");
        let names: Vec<&str> = envs.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_discover_unreadable_root_is_error() {
        let config = ScanConfig::new("/nonexistent/envs/root");
        let err = discover_environments(&config).expect_err("should fail");
        assert_eq!(err.code(), 20);
    }
}
