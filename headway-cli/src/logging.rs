//! Tracing setup for the CLI.
//!
//! Diagnostics go to stderr so stdout stays clean for report output
//! (summaries and `--json` both land on stdout).

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. The level comes from `HEADWAY_LOG`
/// (e.g. `debug` or `headway_core=trace`), defaulting to `warn`.
pub fn init() {
    let filter = EnvFilter::try_from_env("HEADWAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
