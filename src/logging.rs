//! Diagnostic logging to stderr.
//!
//! Menus and command output go to stdout with `println!`; `tracing` is for
//! diagnostics only. `BRANCH_SELECT_LOG` takes an env-filter directive
//! (e.g. `debug` or `branch_select=trace`) and wins over `-v`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "BRANCH_SELECT_LOG";

#[must_use]
pub const fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the global subscriber; later calls are ignored
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
