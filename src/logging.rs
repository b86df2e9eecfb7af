//! Tracing setup for the CLI
//!
//! Logs go to stderr; stdout carries hook JSON and check reports.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "openclaw_snitch=warn";

/// Initialize global tracing. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "openclaw_snitch=debug"
    } else {
        DEFAULT_FILTER
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .try_init();
}
