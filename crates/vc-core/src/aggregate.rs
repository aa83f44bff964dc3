//! Result aggregation and accuracy/latency statistics.
//!
//! Merges per-environment scans into one consolidated report and, when
//! an oracle listing is available, cross-checks scanned records against
//! pip's ground truth. An empty oracle listing means "no ground truth"
//! and produces zeroed, clearly-marked stats rather than spurious
//! mismatches.

use crate::oracle::OracleListing;
use crate::types::{LevelScan, PackageRecord};
use serde::Serialize;
use std::collections::BTreeMap;
use vc_common::{PackageName, ScanLevel};

/// Consolidated report over all scanned environments.
#[derive(Debug, Clone, Serialize)]
pub struct CensusReport {
    /// Timestamp when the report was assembled (ISO-8601).
    pub generated_at: String,

    /// Per-environment entries, sorted by environment name.
    pub environments: Vec<EnvironmentReport>,

    /// Batch totals.
    pub totals: ReportTotals,
}

/// One environment's contribution to the report.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentReport {
    pub environment: String,
    pub level: ScanLevel,
    pub package_count: usize,
    pub duration_ms: u64,

    /// Accuracy against the pip oracle, present only when a comparison
    /// was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<AccuracyStats>,

    pub packages: BTreeMap<PackageName, PackageRecord>,
}

/// Batch totals and latency statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ReportTotals {
    pub environments: usize,
    pub packages: usize,
    pub latency: LatencyStats,
}

/// Scan duration statistics across environments. All zeros for an empty
/// batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyStats {
    pub min_ms: u64,
    pub max_ms: u64,
    pub mean_ms: f64,
}

impl LatencyStats {
    fn from_durations(durations: &[u64]) -> Self {
        if durations.is_empty() {
            return LatencyStats {
                min_ms: 0,
                max_ms: 0,
                mean_ms: 0.0,
            };
        }
        let min_ms = durations.iter().copied().min().unwrap_or(0);
        let max_ms = durations.iter().copied().max().unwrap_or(0);
        let mean_ms = durations.iter().sum::<u64>() as f64 / durations.len() as f64;
        LatencyStats {
            min_ms,
            max_ms,
            mean_ms,
        }
    }
}

/// Accuracy of one scan against the pip oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyStats {
    /// Whether the oracle produced any ground truth. When false, all
    /// counts are zero and the comparison is meaningless.
    pub oracle_available: bool,

    /// Packages the oracle reported.
    pub oracle_count: usize,

    /// Name present in both with equal version strings.
    pub matched: usize,

    /// Name present in both with differing version strings.
    pub version_mismatch: usize,

    /// Oracle-only names (under-reported by the scan).
    pub missing: usize,

    /// Scan-only names (not reported by the oracle).
    pub extra: usize,
}

impl AccuracyStats {
    fn unavailable() -> Self {
        AccuracyStats {
            oracle_available: false,
            oracle_count: 0,
            matched: 0,
            version_mismatch: 0,
            missing: 0,
            extra: 0,
        }
    }
}

/// Compare one scan against an oracle listing.
///
/// Version strings are compared verbatim; no semantic version parsing.
pub fn compare_with_oracle(scan: &LevelScan, oracle: &OracleListing) -> AccuracyStats {
    if oracle.is_empty() {
        return AccuracyStats::unavailable();
    }

    let mut matched = 0;
    let mut version_mismatch = 0;
    let mut missing = 0;

    for (name, oracle_version) in oracle {
        match scan.packages.get(name).and_then(|r| r.version()) {
            Some(version) if version == oracle_version => matched += 1,
            Some(_) => version_mismatch += 1,
            None => missing += 1,
        }
    }

    let extra = scan
        .packages
        .keys()
        .filter(|name| !oracle.contains_key(*name))
        .count();

    AccuracyStats {
        oracle_available: true,
        oracle_count: oracle.len(),
        matched,
        version_mismatch,
        missing,
        extra,
    }
}

/// Merge per-environment scans into a consolidated report. Oracle
/// listings, when supplied, attach accuracy stats to their environment.
pub fn build_report(
    results: BTreeMap<String, LevelScan>,
    oracles: Option<&BTreeMap<String, OracleListing>>,
) -> CensusReport {
    let mut environments = Vec::with_capacity(results.len());
    let mut durations = Vec::with_capacity(results.len());
    let mut total_packages = 0;

    for (name, scan) in results {
        let accuracy = oracles
            .and_then(|map| map.get(&name))
            .map(|oracle| compare_with_oracle(&scan, oracle));

        durations.push(scan.metadata.duration_ms);
        total_packages += scan.packages.len();
        environments.push(EnvironmentReport {
            environment: name,
            level: scan.metadata.level,
            package_count: scan.packages.len(),
            duration_ms: scan.metadata.duration_ms,
            accuracy,
            packages: scan.packages,
        });
    }

    CensusReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        totals: ReportTotals {
            environments: environments.len(),
            packages: total_packages,
            latency: LatencyStats::from_durations(&durations),
        },
        environments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PackageRecord, ScanMetadata};
    use vc_common::PackageName;

    fn scan_of(env: &str, level: ScanLevel, pairs: &[(&str, &str)], duration_ms: u64) -> LevelScan {
        let packages = pairs
            .iter()
            .map(|(name, version)| {
                (
                    PackageName(name.to_string()),
                    PackageRecord::Version {
                        version: version.to_string(),
                    },
                )
            })
            .collect();
        LevelScan {
            packages,
            metadata: ScanMetadata {
                environment: env.to_string(),
                level,
                started_at: "2026-08-23T00:00:00Z".to_string(),
                duration_ms,
                package_count: pairs.len(),
            },
        }
    }

    fn oracle_of(pairs: &[(&str, &str)]) -> OracleListing {
        pairs
            .iter()
            .map(|(name, version)| (PackageName(name.to_string()), version.to_string()))
            .collect()
    }

    #[test]
    fn test_accuracy_counts() {
        let scan = scan_of(
            "env1",
            ScanLevel::L2,
            &[("numpy", "1.26.4"), ("torch", "2.1.0"), ("weird", "0.1")],
            3,
        );
        let oracle = oracle_of(&[
            ("numpy", "1.26.4"),
            ("torch", "2.2.0"),
            ("requests", "2.31.0"),
        ]);

        let stats = compare_with_oracle(&scan, &oracle);
        assert!(stats.oracle_available);
        assert_eq!(stats.oracle_count, 3);
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.version_mismatch, 1);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.extra, 1);
    }

    #[test]
    fn test_empty_oracle_means_no_ground_truth() {
        let scan = scan_of("env1", ScanLevel::L1, &[("numpy", "1.26.4")], 1);
        let stats = compare_with_oracle(&scan, &OracleListing::new());
        assert!(!stats.oracle_available);
        assert_eq!(stats.matched, 0);
        assert_eq!(stats.extra, 0);
    }

    #[test]
    fn test_report_totals_and_latency() {
        let mut results = BTreeMap::new();
        results.insert(
            "a".to_string(),
            scan_of("a", ScanLevel::L1, &[("numpy", "1.0")], 10),
        );
        results.insert(
            "b".to_string(),
            scan_of("b", ScanLevel::L1, &[("x", "1"), ("y", "2")], 30),
        );

        let report = build_report(results, None);
        assert_eq!(report.totals.environments, 2);
        assert_eq!(report.totals.packages, 3);
        assert_eq!(report.totals.latency.min_ms, 10);
        assert_eq!(report.totals.latency.max_ms, 30);
        assert!((report.totals.latency.mean_ms - 20.0).abs() < f64::EPSILON);
        assert!(report.environments.iter().all(|e| e.accuracy.is_none()));
    }

    #[test]
    fn test_report_empty_batch() {
        let report = build_report(BTreeMap::new(), None);
        assert_eq!(report.totals.environments, 0);
        assert_eq!(report.totals.latency, LatencyStats {
            min_ms: 0,
            max_ms: 0,
            mean_ms: 0.0
        });
    }

    #[test]
    fn test_report_attaches_oracle_accuracy() {
        let mut results = BTreeMap::new();
        results.insert(
            "a".to_string(),
            scan_of("a", ScanLevel::L3, &[("numpy", "1.0")], 5),
        );

        let mut oracles = BTreeMap::new();
        oracles.insert("a".to_string(), oracle_of(&[("numpy", "1.0")]));

        let report = build_report(results, Some(&oracles));
        let accuracy = report.environments[0]
            .accuracy
            .as_ref()
            .expect("accuracy attached");
        assert_eq!(accuracy.matched, 1);
    }
}
