//! The four scan-level engines.
//!
//! Each level extracts a package-to-record mapping from an environment's
//! resolved site-packages directory, trading parsing cost for
//! completeness:
//!
//! - L1 parses `.dist-info` directory names only.
//! - L2 reads the first 256 bytes of METADATA and scans the first 5
//!   lines for `Name:`/`Version:`. Packages whose fields fall outside
//!   that window are silently omitted (designed under-reporting).
//! - L3 repeats L2 and adds the INSTALLER marker file.
//! - L4 reads the entire METADATA file, removing the truncation risk,
//!   plus INSTALLER and the direct_url.json origin descriptor.
//!
//! Every per-package failure degrades to omission; a missing
//! site-packages directory yields an empty scan. Nothing here errors.

use crate::resolve::site_packages;
use crate::types::{
    FullRecord, LevelScan, PackageRecord, PackageSource, ScanMetadata, COMMIT_SHORT_LEN,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, span, Level};
use vc_common::{Environment, PackageName, ScanLevel};
use vc_config::ScanConfig;

/// Suffix identifying distribution-metadata directories.
const DIST_INFO_SUFFIX: &str = ".dist-info";

/// How many bytes of METADATA the bounded levels (L2/L3) read.
const METADATA_HEAD_BYTES: usize = 256;

/// How many lines of the excerpt the bounded levels scan.
const METADATA_HEAD_LINES: usize = 5;

const NAME_PREFIX: &str = "Name: ";
const VERSION_PREFIX: &str = "Version: ";

/// Scan one environment at the requested level.
///
/// Returns an empty scan when the environment has no resolvable
/// site-packages directory.
pub fn scan_environment(env: &Environment, level: ScanLevel, config: &ScanConfig) -> LevelScan {
    let _span = span!(Level::DEBUG, "scan", environment = %env.name, level = %level).entered();
    let started_at = chrono::Utc::now().to_rfc3339();
    let start = Instant::now();

    let packages = match site_packages(&env.root, &config.interpreter_prefix) {
        Some(sp) => scan_site_packages(&sp, level),
        None => BTreeMap::new(),
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(
        package_count = packages.len(),
        duration_ms, "scan complete"
    );

    LevelScan {
        metadata: ScanMetadata {
            environment: env.name.clone(),
            level,
            started_at,
            duration_ms,
            package_count: packages.len(),
        },
        packages,
    }
}

fn scan_site_packages(sp: &Path, level: ScanLevel) -> BTreeMap<PackageName, PackageRecord> {
    let mut result = BTreeMap::new();
    let Ok(entries) = fs::read_dir(sp) else {
        return result;
    };

    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(dir_name) = file_name.to_str() else { continue };
        if !dir_name.ends_with(DIST_INFO_SUFFIX) {
            continue;
        }

        let scanned = match level {
            ScanLevel::L1 => scan_dist_info_name(dir_name),
            ScanLevel::L2 => scan_dist_info_l2(&entry.path()),
            ScanLevel::L3 => scan_dist_info_l3(&entry.path()),
            ScanLevel::L4 => scan_dist_info_l4(&entry.path()),
        };

        if let Some((name, record)) = scanned {
            // Last entry wins on normalization collisions (accepted
            // ambiguity; no de-duplication policy is defined).
            result.insert(name, record);
        }
    }

    result
}

/// L1: parse a `<name>-<version>.dist-info` directory name.
///
/// Splits on the LAST hyphen; the trailing segment must be non-empty and
/// start with an ASCII digit, which disambiguates version suffixes from
/// names containing hyphens (`scikit-learn-1.3.0` -> `scikit-learn` +
/// `1.3.0`). Entries failing the test are rejected outright.
fn scan_dist_info_name(dir_name: &str) -> Option<(PackageName, PackageRecord)> {
    let stem = dir_name.strip_suffix(DIST_INFO_SUFFIX)?;
    let (name, version) = stem.rsplit_once('-')?;
    if !version.chars().next()?.is_ascii_digit() {
        return None;
    }
    Some((
        PackageName::from_dist_info(name),
        PackageRecord::Version {
            version: version.to_string(),
        },
    ))
}

/// L2: bounded METADATA header read.
fn scan_dist_info_l2(dist_info: &Path) -> Option<(PackageName, PackageRecord)> {
    let (name, version) = read_metadata_head(&dist_info.join("METADATA"))?;
    Some((name, PackageRecord::Version { version }))
}

/// L3: bounded METADATA header read plus installer marker.
fn scan_dist_info_l3(dist_info: &Path) -> Option<(PackageName, PackageRecord)> {
    let (name, version) = read_metadata_head(&dist_info.join("METADATA"))?;
    let installer = read_installer(&dist_info.join("INSTALLER"));
    Some((name, PackageRecord::Installer { version, installer }))
}

/// L4: full METADATA read plus installer and origin descriptor.
///
/// Packages without a readable METADATA file, or whose METADATA never
/// declares a `Name:` field, are skipped entirely.
fn scan_dist_info_l4(dist_info: &Path) -> Option<(PackageName, PackageRecord)> {
    let (name, version) = read_metadata_full(&dist_info.join("METADATA"))?;

    let mut record = FullRecord {
        version,
        installer: read_installer(&dist_info.join("INSTALLER")),
        ..FullRecord::new()
    };

    match read_origin_file(&dist_info.join("direct_url.json")) {
        OriginFile::Parsed(origin) => apply_origin(&mut record, &origin),
        OriginFile::Malformed(err) => {
            // Malformed descriptors are advisory-only; keep defaults.
            debug!(path = %dist_info.display(), error = %err, "ignoring malformed direct_url.json");
        }
        OriginFile::Missing => {}
    }

    Some((name, PackageRecord::Full(record)))
}

/// Read the first 256 bytes of a METADATA file and scan at most the
/// first 5 lines of the excerpt for `Name:` and `Version:`. Returns
/// `None` unless both fields are found within that window.
fn read_metadata_head(path: &Path) -> Option<(PackageName, String)> {
    let mut file = fs::File::open(path).ok()?;
    let mut buf = [0u8; METADATA_HEAD_BYTES];
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => return None,
        }
    }

    let head = decode_dropping_invalid(&buf[..filled]);

    let mut name = None;
    let mut version = None;
    for line in head.split('\n').take(METADATA_HEAD_LINES) {
        if let Some(value) = line.strip_prefix(NAME_PREFIX) {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(VERSION_PREFIX) {
            version = Some(value.trim().to_string());
        }
        if name.is_some() && version.is_some() {
            break;
        }
    }

    Some((PackageName::from_metadata(&name?), version?))
}

/// Read an entire METADATA file line by line until both `Name:` and
/// `Version:` are found. Returns `None` (skip the package) when the file
/// is unreadable or never declares a name; a missing `Version:` alone is
/// tolerated.
fn read_metadata_full(path: &Path) -> Option<(PackageName, Option<String>)> {
    let file = fs::File::open(path).ok()?;
    let mut name = None;
    let mut version = None;

    for line in BufReader::new(file).lines() {
        let line = line.ok()?;
        if let Some(value) = line.strip_prefix(NAME_PREFIX) {
            name = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(VERSION_PREFIX) {
            version = Some(value.trim().to_string());
        }
        if name.is_some() && version.is_some() {
            break;
        }
    }

    Some((PackageName::from_metadata(&name?), version))
}

/// Read the INSTALLER marker. `None` when the file does not exist,
/// `Some("unknown")` when it exists but trims to empty, the trimmed
/// contents otherwise.
fn read_installer(path: &Path) -> Option<String> {
    let contents = fs::read_to_string(path).ok()?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Some("unknown".to_string())
    } else {
        Some(trimmed.to_string())
    }
}

/// Permissive text decode: invalid byte sequences are dropped, not
/// replaced, so a corrupt byte cannot poison an adjacent field value.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(err) => {
                let valid_up_to = err.valid_up_to();
                out.push_str(std::str::from_utf8(&rest[..valid_up_to]).unwrap_or(""));
                let skip = match err.error_len() {
                    Some(len) => valid_up_to + len,
                    None => rest.len(),
                };
                if skip >= rest.len() {
                    break;
                }
                rest = &rest[skip..];
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Origin descriptor (direct_url.json)
// ---------------------------------------------------------------------------

/// Outcome of reading an origin descriptor. "Not present" and "present
/// but malformed" are distinct so callers can log the latter instead of
/// silently losing the distinction.
#[derive(Debug)]
enum OriginFile {
    Missing,
    Malformed(serde_json::Error),
    Parsed(OriginDescriptor),
}

#[derive(Debug, Deserialize)]
struct OriginDescriptor {
    #[serde(default)]
    vcs_info: Option<VcsInfo>,
    #[serde(default)]
    dir_info: Option<DirInfo>,
}

#[derive(Debug, Deserialize)]
struct VcsInfo {
    #[serde(default)]
    commit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirInfo {
    #[serde(default)]
    editable: bool,
}

fn read_origin_file(path: &Path) -> OriginFile {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(_) => return OriginFile::Missing,
    };
    match serde_json::from_str(&contents) {
        Ok(descriptor) => OriginFile::Parsed(descriptor),
        Err(err) => OriginFile::Malformed(err),
    }
}

/// Apply origin classification. A `vcs_info` section marks the package
/// as a git install with a short commit; `dir_info.editable` overrides
/// to an editable local install (editable wins), and the commit is
/// dropped because it only accompanies the git source.
fn apply_origin(record: &mut FullRecord, origin: &OriginDescriptor) {
    if let Some(vcs) = &origin.vcs_info {
        record.source = PackageSource::Git;
        record.commit = vcs
            .commit_id
            .as_ref()
            .map(|commit| commit.chars().take(COMMIT_SHORT_LEN).collect());
    }
    if origin.dir_info.as_ref().is_some_and(|d| d.editable) {
        record.editable = true;
        record.source = PackageSource::Local;
        record.commit = None;
    }
}
