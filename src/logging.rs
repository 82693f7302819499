//! Diagnostic logging.
//!
//! Diagnostics go to stderr through `tracing`. `RUNBLOCK_LOG` takes an
//! `EnvFilter` directive string and overrides the `-v` flags.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding a filter directive, e.g. `runblock=debug`.
pub const LOG_ENV: &str = "RUNBLOCK_LOG";

/// The default filter for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "runblock=info,warn",
        _ => "runblock=debug,info",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
