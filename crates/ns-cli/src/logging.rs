//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so that command output on stdout stays clean.
//! `RUST_LOG` takes precedence over the `-v`/`-q` flags.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map the CLI verbosity flags to a level.
///
/// - `-q`: warn
/// - default: info
/// - `-v`: debug
/// - `-vv` and up: trace
pub fn level_from_flags(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::WARN;
    }
    match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber.
pub fn init_logging(level: Level) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
}
