//! Process-wide tracing setup for the binary.
//!
//! Info and debug go to stdout, warnings and errors to stderr. `RUST_LOG`
//! overrides the level picked from the verbose flag.

use std::io;
use tracing::{Level, Metadata};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn is_stdout(metadata: &Metadata<'_>) -> bool {
    *metadata.level() >= Level::INFO
}

fn is_stderr(metadata: &Metadata<'_>) -> bool {
    *metadata.level() <= Level::WARN
}

/// Initialise the global tracing subscriber.
///
/// Non-verbose output is the bare message; verbose output adds time, level
/// and target and lowers the level to debug. Only the first call takes
/// effect.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(io::stdout)
                    .with_filter(filter_fn(is_stdout)),
            )
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_filter(filter_fn(is_stderr)),
            )
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .without_time()
                    .with_level(false)
                    .with_target(false)
                    .with_writer(io::stdout)
                    .with_filter(filter_fn(is_stdout)),
            )
            .with(
                fmt::layer()
                    .without_time()
                    .with_level(false)
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_filter(filter_fn(is_stderr)),
            )
            .try_init()
            .ok();
    }
}
