//! Common types for scan results.
//!
//! `PackageRecord` is a tagged variant per scan level rather than a bag
//! of optional fields: L1/L2 can only ever produce a version, L3 adds
//! installer provenance, and only L4 carries source classification. The
//! variant makes level-specific field availability explicit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vc_common::{PackageName, ScanLevel};

/// Commit identifiers captured from origin descriptors are truncated to
/// this many characters.
pub const COMMIT_SHORT_LEN: usize = 8;

/// Where a package was installed from, refined at L4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageSource {
    /// Regular index install (default when no origin descriptor exists).
    #[default]
    Pypi,
    /// Installed from a version-control URL.
    Git,
    /// Editable install from a local directory.
    Local,
}

impl PackageSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageSource::Pypi => "pypi",
            PackageSource::Git => "git",
            PackageSource::Local => "local",
        }
    }
}

impl std::fmt::Display for PackageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Complete package record, produced only at L4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullRecord {
    /// Version string, absent when METADATA lacks a `Version:` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Installer marker contents; `Some("unknown")` when the marker file
    /// exists but is empty, `None` when it does not exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installer: Option<String>,

    /// Source classification from the origin descriptor.
    pub source: PackageSource,

    /// Whether this is an editable install.
    pub editable: bool,

    /// Short commit identifier, exactly 8 characters, present only when
    /// `source` is `Git`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl FullRecord {
    /// Record with defaults: no version, no installer, pypi, not editable.
    pub fn new() -> Self {
        FullRecord {
            version: None,
            installer: None,
            source: PackageSource::default(),
            editable: false,
            commit: None,
        }
    }
}

impl Default for FullRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of scanning one package, shaped by the level used.
///
/// Higher levels strictly add or refine fields; version strings are raw
/// and never semantically compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PackageRecord {
    /// L1/L2: name and version only.
    Version { version: String },

    /// L3: version plus installer provenance.
    Installer {
        version: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        installer: Option<String>,
    },

    /// L4: the full record.
    Full(FullRecord),
}

impl PackageRecord {
    /// Version string, if this record carries one.
    pub fn version(&self) -> Option<&str> {
        match self {
            PackageRecord::Version { version } => Some(version),
            PackageRecord::Installer { version, .. } => Some(version),
            PackageRecord::Full(full) => full.version.as_deref(),
        }
    }

    /// Installer string, available from L3 upward.
    pub fn installer(&self) -> Option<&str> {
        match self {
            PackageRecord::Version { .. } => None,
            PackageRecord::Installer { installer, .. } => installer.as_deref(),
            PackageRecord::Full(full) => full.installer.as_deref(),
        }
    }
}

/// Result of scanning one environment at one level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelScan {
    /// Normalized package name to record.
    pub packages: BTreeMap<PackageName, PackageRecord>,

    /// Scan metadata.
    pub metadata: ScanMetadata,
}

impl LevelScan {
    /// Number of packages found.
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }
}

/// Metadata about one scan operation.
#[derive(Debug, Clone, Serialize)]
pub struct ScanMetadata {
    /// Environment name.
    pub environment: String,

    /// Level used for this scan.
    pub level: ScanLevel,

    /// Timestamp when the scan started (ISO-8601).
    pub started_at: String,

    /// Duration of the scan.
    pub duration_ms: u64,

    /// Number of packages collected.
    pub package_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_version_accessor() {
        let record = PackageRecord::Version { version: "1.26.4".into() };
        assert_eq!(record.version(), Some("1.26.4"));
        assert_eq!(record.installer(), None);

        let record = PackageRecord::Installer {
            version: "1.26.4".into(),
            installer: Some("pip".into()),
        };
        assert_eq!(record.installer(), Some("pip"));

        let record = PackageRecord::Full(FullRecord::new());
        assert_eq!(record.version(), None);
    }

    #[test]
    fn test_full_record_serializes_without_absent_fields() {
        let json = serde_json::to_value(PackageRecord::Full(FullRecord::new()))
            .expect("serialize record");
        assert_eq!(json["source"], "pypi");
        assert_eq!(json["editable"], false);
        assert!(json.get("version").is_none());
        assert!(json.get("commit").is_none());
    }

    #[test]
    fn test_default_source_is_pypi() {
        assert_eq!(PackageSource::default(), PackageSource::Pypi);
    }
}
