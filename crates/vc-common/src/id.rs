//! Package and environment identity types.
//!
//! A package is keyed by its normalized name within one environment's
//! result set. Two normalization paths exist and they are NOT identical:
//! directory-name parsing folds underscores to hyphens, metadata-field
//! parsing does not. Both are preserved faithfully; see the cross-level
//! consistency tests in vc-core before unifying them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Normalized package name used as the result-set key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(pub String);

impl PackageName {
    /// Normalize a name parsed from a `.dist-info` directory stem.
    ///
    /// Lowercases and folds underscores to hyphens, so `My_Package` and
    /// `my-package` key identically.
    pub fn from_dist_info(raw: &str) -> Self {
        PackageName(raw.to_lowercase().replace('_', "-"))
    }

    /// Normalize a name read from a METADATA `Name:` field.
    ///
    /// Lowercases only. Underscores are kept as-is, matching what the
    /// metadata file actually declares.
    pub fn from_metadata(raw: &str) -> Self {
        PackageName(raw.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An isolated installation root with its own interpreter and packages.
///
/// Immutable once discovered; all scans treat it as a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Environment name (directory basename under the environments root).
    pub name: String,

    /// Absolute root path of the environment.
    pub root: PathBuf,
}

impl Environment {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Environment {
            name: name.into(),
            root: root.into(),
        }
    }

    /// Path to the environment's interpreter binary.
    pub fn interpreter(&self) -> PathBuf {
        self.root.join("bin").join("python")
    }

    /// Whether the interpreter binary exists. Environments without one
    /// are not scannable and are filtered out during discovery.
    pub fn has_interpreter(&self) -> bool {
        self.interpreter().exists()
    }

    /// The environment's `lib` directory, searched for version folders.
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }
}

impl AsRef<Path> for Environment {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}
