//! Log output for hosts that do not install their own subscriber
//!
//! Events from the bumper crates are shown at the chosen level while every
//! other crate is held to warnings. `RUST_LOG`, when set, replaces both.

use tracing::Level;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

/// Crates whose events follow the requested level
const BUMPER_CRATES: [&str; 3] = ["bumper_core", "bumper_content", "bumper_fs"];

/// Show bump progress (one line per written file) on stderr.
///
/// Fails when a global subscriber is already installed.
pub fn init() -> Result<(), TryInitError> {
    init_at(Level::INFO)
}

/// Like [`init`], showing bumper events at `level` and above.
pub fn init_at(level: Level) -> Result<(), TryInitError> {
    let output = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    tracing_subscriber::registry()
        .with(filter(level))
        .with(output)
        .try_init()
}

fn filter(level: Level) -> EnvFilter {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => builder.parse_lossy(directives),
        _ => builder.parse_lossy(directives_for(level)),
    }
}

fn directives_for(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    BUMPER_CRATES
        .iter()
        .map(|name| format!("{name}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_directives_name_each_bumper_crate() {
        assert_eq!(
            directives_for(Level::DEBUG),
            "bumper_core=debug,bumper_content=debug,bumper_fs=debug"
        );
    }

    #[test]
    fn test_second_init_is_an_error() {
        let _ = init();
        assert!(init_at(Level::TRACE).is_err());

        tracing::info!(file = "VERSION", "logging initialized");
    }
}
