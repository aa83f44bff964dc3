//! Venv Census - tiered package inventory for Python virtual environments
//!
//! Commands:
//! - `list-envs`: discover scannable environments under the root
//! - `scan`: inventory packages at profile-selected or forced levels
//! - `check`: scan and cross-check each environment against pip

use clap::{Args, Parser, Subcommand};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::thread;
use tracing::info;
use vc_common::{format_error_human, Environment, Error, OutputFormat, Result, ScanLevel};
use vc_config::{Profile, ScanConfig};
use vc_core::aggregate::{build_report, CensusReport};
use vc_core::discover_environments;
use vc_core::logging::init_logging;
use vc_core::oracle::{pip_list, OracleListing};
use vc_core::runner::run_tasks;
use vc_core::schedule::{partition_environments, plan, plan_uniform};

/// Venv Census - tiered package inventory for Python virtual environments
#[derive(Parser)]
#[command(name = "vc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Root directory containing one subdirectory per environment
    #[arg(long, global = true, env = "VC_ENVS_ROOT")]
    envs_root: Option<PathBuf>,

    /// Prefix of the interpreter version folder under <env>/lib
    #[arg(long, global = true, default_value = "python")]
    interpreter_prefix: String,

    /// Maximum scans in flight concurrently
    #[arg(long, global = true, default_value = "8")]
    max_parallel: usize,

    /// Timeout for one pip oracle invocation (seconds)
    #[arg(long, global = true, default_value = "30")]
    oracle_timeout: u64,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "json")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover scannable environments under the root
    ListEnvs,

    /// Inventory installed packages across environments
    Scan(ScanArgs),

    /// Scan and cross-check each environment against pip's own listing
    Check(ScanArgs),
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// Scan profile (turbo, fast, balanced, accurate, full)
    #[arg(long, default_value = "full")]
    profile: Profile,

    /// Environments to treat as changed (others count as cached)
    #[arg(long, value_delimiter = ',')]
    changed: Vec<String>,

    /// Force one level for every environment, ignoring the profile
    #[arg(long)]
    level: Option<ScanLevel>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose, cli.global.quiet);

    if let Err(err) = run(&cli) {
        let use_color = !cli.global.no_color && std::io::stderr().is_terminal();
        eprintln!("{}", format_error_human(&err, use_color));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(&cli.global)?;

    match &cli.command {
        Commands::ListEnvs => cmd_list_envs(&config, cli.global.format),
        Commands::Scan(args) => cmd_scan(&config, args, cli.global.format, false),
        Commands::Check(args) => cmd_scan(&config, args, cli.global.format, true),
    }
}

fn build_config(global: &GlobalOpts) -> Result<ScanConfig> {
    let envs_root = global.envs_root.clone().ok_or_else(|| {
        Error::Config("no environments root; pass --envs-root or set VC_ENVS_ROOT".to_string())
    })?;

    Ok(ScanConfig::new(envs_root)
        .with_interpreter_prefix(&global.interpreter_prefix)
        .with_max_parallel(global.max_parallel)
        .with_oracle_timeout(std::time::Duration::from_secs(global.oracle_timeout)))
}

#[derive(serde::Serialize)]
struct EnvListing {
    name: String,
    root: PathBuf,
    interpreter: PathBuf,
}

fn cmd_list_envs(config: &ScanConfig, format: OutputFormat) -> Result<()> {
    let environments = discover_environments(config)?;
    info!(count = environments.len(), "discovered environments");

    let listings: Vec<EnvListing> = environments
        .into_iter()
        .map(|env| EnvListing {
            interpreter: env.interpreter(),
            name: env.name,
            root: env.root,
        })
        .collect();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
        OutputFormat::Summary => {
            for env in &listings {
                println!("{}\t{}", env.name, env.root.display());
            }
        }
    }
    Ok(())
}

fn cmd_scan(
    config: &ScanConfig,
    args: &ScanArgs,
    format: OutputFormat,
    with_oracle: bool,
) -> Result<()> {
    let environments = discover_environments(config)?;
    let tasks = match args.level {
        Some(level) => plan_uniform(level, &environments),
        None => {
            let (cached, changed) = partition_environments(&environments, &args.changed)?;
            plan(args.profile, &cached, &changed)
        }
    };

    let results = run_tasks(tasks, config);

    let report = if with_oracle {
        let oracles = collect_oracles(&environments, config);
        build_report(results, Some(&oracles))
    } else {
        build_report(results, None)
    };

    emit_report(&report, format)
}

/// Query the pip oracle for every environment, in parallel. Oracle
/// invocations are independent of the scan tasks; a slow or broken pip
/// in one environment only blanks that environment's accuracy stats.
fn collect_oracles(
    environments: &[Environment],
    config: &ScanConfig,
) -> BTreeMap<String, OracleListing> {
    let listings = Mutex::new(BTreeMap::new());

    thread::scope(|scope| {
        let listings = &listings;
        for env in environments {
            scope.spawn(move || {
                let listing = pip_list(env, config.oracle_timeout);
                listings
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(env.name.clone(), listing);
            });
        }
    });

    listings.into_inner().unwrap_or_else(PoisonError::into_inner)
}

fn emit_report(report: &CensusReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Summary => {
            for env in &report.environments {
                let accuracy = match &env.accuracy {
                    Some(a) if a.oracle_available => format!(
                        "\tmatched={}/{} mismatched={} missing={} extra={}",
                        a.matched, a.oracle_count, a.version_mismatch, a.missing, a.extra
                    ),
                    Some(_) => "\toracle=unavailable".to_string(),
                    None => String::new(),
                };
                println!(
                    "{}\t{}\tpackages={}\t{}ms{}",
                    env.environment, env.level, env.package_count, env.duration_ms, accuracy
                );
            }
            println!(
                "total\tenvironments={} packages={} latency={}..{}ms mean={:.1}ms",
                report.totals.environments,
                report.totals.packages,
                report.totals.latency.min_ms,
                report.totals.latency.max_ms,
                report.totals.latency.mean_ms
            );
        }
    }
    Ok(())
}
