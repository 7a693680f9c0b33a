//! Logging setup for the command-line tool.
//!
//! Library code only emits `tracing` events; the binary decides where they go.
//! Output is written to stderr so stdout stays free for command output.
//! `RUST_LOG` takes precedence over the `-v` count when set.

use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: 0 warn, 1 info, 2 debug, 3+ trace.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one is left in place.
pub fn init_logging(verbosity: u8) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false);

    tracing_subscriber::registry().with(env_filter).with(stderr_layer).try_init().is_ok()
}
