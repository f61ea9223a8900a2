//! Subscriber setup for the binary. The library only emits `tracing` events.

use tracing_subscriber::EnvFilter;

/// Default filter directive for the verbosity flags. `-q` wins over `-v`.
#[must_use]
pub const fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Build the filter: `RUST_LOG` when set and valid, else the flag level.
#[must_use]
pub fn filter_for(verbose: u8, quiet: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose, quiet)))
}

/// Install a stderr `fmt` subscriber. Stdout stays reserved for command
/// output. A second call is a no-op.
pub fn init(verbose: u8, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(verbose, quiet))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
