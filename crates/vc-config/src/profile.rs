//! Scan profiles for common speed/accuracy tradeoffs.
//!
//! A profile is a static policy assigning a scan level to each
//! environment based on its cache-trust classification:
//! - Turbo: L1 everywhere, trust everything
//! - Fast: L1 for cached, L2 for changed
//! - Balanced: L1 for cached, L3 for changed
//! - Accurate: L3 everywhere
//! - Full: L4 everywhere (default)
//!
//! The cached/changed partition itself is supplied by the caller; the
//! profile only decides levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use vc_common::ScanLevel;

/// Available scan profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// L1 for all environments, cheapest possible pass
    Turbo,
    /// L1 for cached environments, L2 for changed
    Fast,
    /// L1 for cached environments, L3 for changed
    Balanced,
    /// L3 for all environments
    Accurate,
    /// L4 for all environments, most complete records
    #[default]
    Full,
}

impl Profile {
    /// All available profile names.
    pub const ALL: &'static [Profile] = &[
        Profile::Turbo,
        Profile::Fast,
        Profile::Balanced,
        Profile::Accurate,
        Profile::Full,
    ];

    /// Get profile name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Turbo => "turbo",
            Profile::Fast => "fast",
            Profile::Balanced => "balanced",
            Profile::Accurate => "accurate",
            Profile::Full => "full",
        }
    }

    /// Parse profile name from string.
    pub fn parse(s: &str) -> Option<Profile> {
        match s.to_lowercase().as_str() {
            "turbo" => Some(Profile::Turbo),
            "fast" => Some(Profile::Fast),
            "balanced" => Some(Profile::Balanced),
            "accurate" => Some(Profile::Accurate),
            "full" | "default" => Some(Profile::Full),
            _ => None,
        }
    }

    /// Scan level for environments classified as cached (trusted).
    pub fn cached_level(&self) -> ScanLevel {
        match self {
            Profile::Turbo | Profile::Fast | Profile::Balanced => ScanLevel::L1,
            Profile::Accurate => ScanLevel::L3,
            Profile::Full => ScanLevel::L4,
        }
    }

    /// Scan level for environments classified as changed (must rescan).
    pub fn changed_level(&self) -> ScanLevel {
        match self {
            Profile::Turbo => ScanLevel::L1,
            Profile::Fast => ScanLevel::L2,
            Profile::Balanced | Profile::Accurate => ScanLevel::L3,
            Profile::Full => ScanLevel::L4,
        }
    }

    /// Get a description of the profile.
    pub fn description(&self) -> &'static str {
        match self {
            Profile::Turbo => "L1 everywhere: fastest, directory names only",
            Profile::Fast => "L1 cached / L2 changed: fast with header verification",
            Profile::Balanced => "L1 cached / L3 changed: adds installer provenance",
            Profile::Accurate => "L3 everywhere: header + installer for every environment",
            Profile::Full => "L4 everywhere: complete records, no truncation risk",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Profile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::parse(s).ok_or_else(|| ProfileError::UnknownProfile(s.to_string()))
    }
}

/// Errors related to profile selection.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProfileError {
    #[error("unknown profile '{0}'. Available: turbo, fast, balanced, accurate, full")]
    UnknownProfile(String),
}
