//! Reference oracle: pip's own view of an environment.
//!
//! Invokes `<env>/bin/python -m pip list --format=json` with a bounded
//! timeout to obtain authoritative name/version pairs. The oracle is
//! advisory only: a missing interpreter, spawn failure, timeout,
//! non-zero exit, or malformed output all degrade to an empty listing.
//! It must never block or fail the scanning pipeline it is compared
//! against, so callers run it independently of the scan tasks.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use vc_common::{Environment, PackageName};

/// Ground-truth name to version mapping from pip.
pub type OracleListing = BTreeMap<PackageName, String>;

/// Errors that make the oracle unavailable. Never propagated past
/// [`pip_list`]; exposed for logging and tests.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("environment has no interpreter")]
    NoInterpreter,

    #[error("failed to spawn pip: {0}")]
    SpawnFailed(String),

    #[error("pip timed out after {0:?}")]
    Timeout(Duration),

    #[error("pip exited with status {0}")]
    NonZeroExit(i32),

    #[error("failed to parse pip output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct PipListEntry {
    name: String,
    version: String,
}

/// Query pip for the environment's installed packages.
///
/// All failures degrade to an empty listing; callers treat an empty
/// oracle as "no ground truth", not as an error.
pub fn pip_list(env: &Environment, timeout: Duration) -> OracleListing {
    match try_pip_list(env, timeout) {
        Ok(listing) => listing,
        Err(err) => {
            debug!(environment = %env.name, error = %err, "pip oracle unavailable");
            OracleListing::new()
        }
    }
}

fn try_pip_list(env: &Environment, timeout: Duration) -> Result<OracleListing, OracleError> {
    let python = env.interpreter();
    if !python.exists() {
        return Err(OracleError::NoInterpreter);
    }

    let mut child = Command::new(&python)
        .args(["-m", "pip", "list", "--format=json"])
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .env("LC_ALL", "C")
        .env("LANG", "C")
        .spawn()
        .map_err(|e| OracleError::SpawnFailed(e.to_string()))?;

    let pid = child.id();
    let finished = Arc::new(AtomicBool::new(false));
    let finished_clone = finished.clone();
    let timed_out = Arc::new(AtomicBool::new(false));
    let timed_out_clone = timed_out.clone();

    // Watchdog: kill pip at the deadline so a stuck interpreter cannot
    // hold the comparison hostage.
    thread::spawn(move || {
        thread::sleep(timeout);
        if !finished_clone.load(Ordering::Relaxed) {
            timed_out_clone.store(true, Ordering::Relaxed);
            debug!(pid, "pip oracle timed out, killing");
            #[cfg(unix)]
            unsafe {
                libc::kill(pid as i32, libc::SIGKILL);
            }
        }
    });

    let mut stdout_buf = Vec::new();
    if let Some(mut stdout) = child.stdout.take() {
        stdout.read_to_end(&mut stdout_buf)?;
    }

    // Mark as finished before waiting, so we don't race with PID reuse.
    finished.store(true, Ordering::Relaxed);
    let status = child.wait()?;

    if timed_out.load(Ordering::Relaxed) {
        return Err(OracleError::Timeout(timeout));
    }
    if !status.success() {
        return Err(OracleError::NonZeroExit(status.code().unwrap_or(-1)));
    }

    let entries: Vec<PipListEntry> = serde_json::from_slice(&stdout_buf)?;
    Ok(entries
        .into_iter()
        .map(|e| (PackageName::from_metadata(&e.name), e.version))
        .collect())
}
