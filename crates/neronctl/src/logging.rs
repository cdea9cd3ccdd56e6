//! Log setup for neronctl
//!
//! Logs go to stderr so replies on stdout stay clean. `-v` wins over
//! `$NERON_LOG`, which wins over the `warn` default.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NERON_LOG";

pub fn filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Install the global subscriber. Safe to call twice; the second call is a no-op.
pub fn init(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
