// SPDX-License-Identifier: MIT
//
// Logging setup for the reference host.
//
// Everything goes to stderr so the screen dumps on stdout stay clean. The
// level comes from the `-v` count unless `BUFCYCLE_LOG` holds a filter
// directive, which always wins (`BUFCYCLE_LOG=bufcycle_core=trace`).

use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable read for a filter directive.
pub const ENV_VAR: &str = "BUFCYCLE_LOG";

/// Map the number of `-v` flags to a level.
#[must_use]
pub const fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. A second call keeps the first subscriber.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).as_str().to_lowercase()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(io::stderr().is_terminal())
        .without_time()
        .try_init();
    if let Err(err) = installed {
        tracing::trace!(%err, "subscriber already installed");
    }
}
