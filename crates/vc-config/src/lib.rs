//! Venv Census configuration.
//!
//! This crate provides:
//! - Profile presets mapping environment classification to scan levels
//! - The explicit `ScanConfig` passed into the resolver, scheduler, and
//!   runner (the environments root is configuration, never a process-wide
//!   constant)

pub mod profile;

pub use profile::{Profile, ProfileError};

use std::path::PathBuf;
use std::time::Duration;

/// Default prefix for interpreter version folders under `<env>/lib`.
pub const DEFAULT_INTERPRETER_PREFIX: &str = "python";

/// Default maximum number of scans in flight concurrently.
pub const DEFAULT_MAX_PARALLEL: usize = 8;

/// Default timeout for one pip oracle invocation, in seconds.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;

/// Explicit configuration for a scanning run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root directory containing one subdirectory per environment.
    pub envs_root: PathBuf,

    /// Prefix of the interpreter version folder under `<env>/lib`
    /// (e.g. `python` matches `python3.11`).
    pub interpreter_prefix: String,

    /// Maximum simultaneously active scans.
    pub max_parallel: usize,

    /// Timeout for a single pip oracle invocation.
    pub oracle_timeout: Duration,
}

impl ScanConfig {
    /// Create a configuration with defaults for everything but the root.
    pub fn new(envs_root: impl Into<PathBuf>) -> Self {
        ScanConfig {
            envs_root: envs_root.into(),
            interpreter_prefix: DEFAULT_INTERPRETER_PREFIX.to_string(),
            max_parallel: DEFAULT_MAX_PARALLEL,
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }

    /// Override the interpreter folder prefix.
    pub fn with_interpreter_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.interpreter_prefix = prefix.into();
        self
    }

    /// Override the concurrency bound (clamped to at least 1).
    pub fn with_max_parallel(mut self, max_parallel: usize) -> Self {
        self.max_parallel = max_parallel.max(1);
        self
    }

    /// Override the oracle timeout.
    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::new("/envs");
        assert_eq!(config.envs_root, PathBuf::from("/envs"));
        assert_eq!(config.interpreter_prefix, "python");
        assert_eq!(config.max_parallel, 8);
        assert_eq!(config.oracle_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_max_parallel_clamped() {
        let config = ScanConfig::new("/envs").with_max_parallel(0);
        assert_eq!(config.max_parallel, 1);
    }
}
