//! Tracing infrastructure.
//!
//! Structured, async-aware logging via `tracing` and `tracing-subscriber`.
//! The level comes from configuration, with `RUST_LOG` taking precedence
//! when set so operators can raise verbosity per target without touching
//! the deployment configuration.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber at `level` (trace, debug, info, warn,
/// error). `RUST_LOG`, when present, overrides it.
///
/// Returns an error if a global subscriber is already installed or the
/// level string is not a valid filter directive.
pub fn init(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|err| format!("invalid log filter: {err}"))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init()
        .map_err(|err| format!("failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_init_succeeds_then_second_fails() {
        // Both calls run in one test: the global subscriber can only be
        // installed once per process.
        assert!(init("info").is_ok());
        assert!(init("debug").is_err());
    }
}
