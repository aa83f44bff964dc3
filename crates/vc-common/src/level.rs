//! Scan level ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of four scan algorithms trading parsing cost for completeness.
///
/// Levels are totally ordered: `L1 < L2 < L3 < L4`. Higher levels add or
/// refine record fields; no level removes information available at a
/// lower level (the L2/L3 256-byte truncation is a designed accuracy
/// loss, not a field removal).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScanLevel {
    /// Parse `.dist-info` directory names only.
    L1,
    /// Read the first 256 bytes of METADATA.
    L2,
    /// L2 plus the INSTALLER marker file.
    L3,
    /// Full METADATA read plus INSTALLER and direct_url.json.
    L4,
}

impl ScanLevel {
    /// All levels, cheapest first.
    pub const ALL: &'static [ScanLevel] =
        &[ScanLevel::L1, ScanLevel::L2, ScanLevel::L3, ScanLevel::L4];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanLevel::L1 => "l1",
            ScanLevel::L2 => "l2",
            ScanLevel::L3 => "l3",
            ScanLevel::L4 => "l4",
        }
    }

    /// Parse a level name, case-insensitive.
    pub fn parse(s: &str) -> Option<ScanLevel> {
        match s.to_lowercase().as_str() {
            "l1" | "1" => Some(ScanLevel::L1),
            "l2" | "2" => Some(ScanLevel::L2),
            "l3" | "3" => Some(ScanLevel::L3),
            "l4" | "4" => Some(ScanLevel::L4),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScanLevel::L1 => "directory-name scan (cheapest, name+version only)",
            ScanLevel::L2 => "bounded 256-byte METADATA read",
            ScanLevel::L3 => "bounded METADATA read plus installer marker",
            ScanLevel::L4 => "full METADATA, installer, and origin descriptor",
        }
    }
}

impl fmt::Display for ScanLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScanLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScanLevel::parse(s).ok_or_else(|| {
            format!(
                "unknown scan level '{}'. Available: {}",
                s,
                ScanLevel::ALL
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}
