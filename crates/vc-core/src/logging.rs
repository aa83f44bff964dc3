//! Logging setup for the `vc` binary.
//!
//! stdout is reserved for command payloads (JSON or summary output);
//! all log lines go to stderr. Verbosity comes from `-v`/`--quiet`,
//! and `VC_LOG`/`RUST_LOG` override the derived filter entirely.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, EnvFilter};

/// Map CLI verbosity flags onto a tracing level directive.
///
/// `--quiet` wins over any number of `-v` flags.
pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize the logging subsystem.
///
/// Must be called once at startup before any logging occurs.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    let filter = std::env::var("VC_LOG")
        .ok()
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| {
            EnvFilter::new(format!(
                "vc_core={level},vc_config={level},vc_common={level}"
            ))
        });

    let use_ansi = std::io::stderr().is_terminal();
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(use_ansi)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(level_for(3, true), "error");
    }

    #[test]
    fn test_verbosity_ladder() {
        assert_eq!(level_for(0, false), "info");
        assert_eq!(level_for(1, false), "debug");
        assert_eq!(level_for(2, false), "trace");
        assert_eq!(level_for(9, false), "trace");
    }
}
