//! Bounded worker-pool execution of scan tasks.
//!
//! At most `max_parallel` scans are in flight at once. Workers draw
//! tasks from a shared queue, so a slow disk under one environment
//! never delays the completion of others, and each result lands in its
//! own slot of the result map. Tasks are independent read-only I/O;
//! there is no ordering between them and no cancellation semantics.

use crate::levels::scan_environment;
use crate::schedule::ScanTask;
use crate::types::LevelScan;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::{info, warn};
use vc_config::ScanConfig;

/// Execute a batch of scan tasks under the configured concurrency bound.
///
/// Returns results keyed by environment name. A panicking worker is
/// contained: its remaining environments may be picked up by other
/// workers and everything already inserted is kept.
pub fn run_tasks(tasks: Vec<ScanTask>, config: &ScanConfig) -> BTreeMap<String, LevelScan> {
    if tasks.is_empty() {
        return BTreeMap::new();
    }

    let worker_count = config.max_parallel.max(1).min(tasks.len());
    info!(
        count = tasks.len(),
        workers = worker_count,
        "dispatching scan tasks"
    );

    let queue = Mutex::new(VecDeque::from(tasks));
    let results = Mutex::new(BTreeMap::new());

    thread::scope(|scope| {
        let handles: Vec<_> = (0..worker_count)
            .map(|_| {
                scope.spawn(|| loop {
                    let task = queue
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .pop_front();
                    let Some(task) = task else { break };

                    let scan = scan_environment(&task.environment, task.level, config);
                    results
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(task.environment.name.clone(), scan);
                })
            })
            .collect();

        for handle in handles {
            if handle.join().is_err() {
                warn!("scan worker panicked");
            }
        }
    });

    results.into_inner().unwrap_or_else(PoisonError::into_inner)
}
