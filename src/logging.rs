//! Logging setup
//!
//! Logs go to stderr through `tracing-subscriber`, so stdout stays usable
//! for listings and dry-run requests. `RUST_LOG` overrides everything else.

use crate::config::LogLevel;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive for the configured level and the -v/-q flags
pub fn filter_directive(level: LogLevel, verbose: u8, quiet: bool) -> String {
    if quiet {
        return "warn".to_string();
    }
    match verbose {
        0 => level.as_str().to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber; later calls are ignored
pub fn init(level: LogLevel, verbose: u8, quiet: bool) {
    let directive = filter_directive(level, verbose, quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
