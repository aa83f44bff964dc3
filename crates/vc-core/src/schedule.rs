//! Profile scheduling: assigning a scan level to each environment.
//!
//! The scheduler only plans. It takes the cached/changed partition from
//! the caller (change detection is an external collaborator) and the
//! profile's level mapping from configuration; dispatch belongs to the
//! runner.

use tracing::debug;
use vc_common::{Environment, Error, Result, ScanLevel};
use vc_config::Profile;

/// One unit of work for the runner: scan this environment at this level.
#[derive(Debug, Clone)]
pub struct ScanTask {
    pub environment: Environment,
    pub level: ScanLevel,
}

/// Plan one scan task per environment, using the profile's level for its
/// partition. Cached environments come first, in the order supplied.
pub fn plan(profile: Profile, cached: &[Environment], changed: &[Environment]) -> Vec<ScanTask> {
    let mut tasks = Vec::with_capacity(cached.len() + changed.len());
    for env in cached {
        tasks.push(ScanTask {
            environment: env.clone(),
            level: profile.cached_level(),
        });
    }
    for env in changed {
        tasks.push(ScanTask {
            environment: env.clone(),
            level: profile.changed_level(),
        });
    }
    debug!(
        profile = %profile,
        cached = cached.len(),
        changed = changed.len(),
        "planned scan tasks"
    );
    tasks
}

/// Plan every environment at one forced level, bypassing the profile.
pub fn plan_uniform(level: ScanLevel, environments: &[Environment]) -> Vec<ScanTask> {
    environments
        .iter()
        .map(|env| ScanTask {
            environment: env.clone(),
            level,
        })
        .collect()
}

/// Split discovered environments into (cached, changed) using the
/// caller-supplied list of changed names. Every named environment must
/// exist in the discovered set.
pub fn partition_environments(
    environments: &[Environment],
    changed_names: &[String],
) -> Result<(Vec<Environment>, Vec<Environment>)> {
    for name in changed_names {
        if !environments.iter().any(|env| &env.name == name) {
            return Err(Error::EnvironmentNotFound { name: name.clone() });
        }
    }

    let (changed, cached): (Vec<_>, Vec<_>) = environments
        .iter()
        .cloned()
        .partition(|env| changed_names.contains(&env.name));
    Ok((cached, changed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envs(names: &[&str]) -> Vec<Environment> {
        names
            .iter()
            .map(|n| Environment::new(*n, format!("/envs/{n}")))
            .collect()
    }

    #[test]
    fn test_plan_one_task_per_environment() {
        let cached = envs(&["a", "b"]);
        let changed = envs(&["c"]);
        let tasks = plan(Profile::Balanced, &cached, &changed);

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].level, ScanLevel::L1);
        assert_eq!(tasks[1].level, ScanLevel::L1);
        assert_eq!(tasks[2].environment.name, "c");
        assert_eq!(tasks[2].level, ScanLevel::L3);
    }

    #[test]
    fn test_plan_full_uses_l4_everywhere() {
        let cached = envs(&["a"]);
        let changed = envs(&["b"]);
        for task in plan(Profile::Full, &cached, &changed) {
            assert_eq!(task.level, ScanLevel::L4);
        }
    }

    #[test]
    fn test_plan_uniform() {
        let tasks = plan_uniform(ScanLevel::L2, &envs(&["a", "b"]));
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| t.level == ScanLevel::L2));
    }

    #[test]
    fn test_partition_by_changed_names() {
        let all = envs(&["a", "b", "c"]);
        let (cached, changed) =
            partition_environments(&all, &["b".to_string()]).expect("partition");
        assert_eq!(cached.len(), 2);
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].name, "b");
    }

    #[test]
    fn test_partition_rejects_unknown_name() {
        let all = envs(&["a"]);
        let err = partition_environments(&all, &["ghost".to_string()]).expect_err("should fail");
        assert_eq!(err.code(), 21);
    }
}
