//! Venv Census Core Library
//!
//! This library provides the tiered package-inventory engine:
//! - Site-packages resolution and environment discovery
//! - Four scan-level engines (L1-L4) over on-disk dist-info metadata
//! - The pip reference oracle for accuracy cross-checks
//! - Profile scheduling and the bounded worker-pool runner
//! - Result aggregation and accuracy/latency statistics
//!
//! The binary entry point is in `main.rs`.

pub mod aggregate;
pub mod levels;
pub mod logging;
pub mod oracle;
pub mod resolve;
pub mod runner;
pub mod schedule;
pub mod types;

pub use aggregate::{build_report, compare_with_oracle, AccuracyStats, CensusReport};
pub use levels::scan_environment;
pub use oracle::{pip_list, OracleListing};
pub use resolve::{discover_environments, site_packages};
pub use runner::run_tasks;
pub use schedule::{partition_environments, plan, ScanTask};
pub use types::{FullRecord, LevelScan, PackageRecord, PackageSource, ScanMetadata};

#[cfg(test)]
pub(crate) mod test_fixtures;
