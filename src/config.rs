//! Configuration loading for the sender pipeline.
//!
//! Configuration is strongly typed and loaded with figment from environment
//! variables, matching how the module is configured when deployed alongside
//! its decoder container:
//!
//! - `INTERVAL` — sampling interval in milliseconds (default 2000)
//! - `DECODER` — decoder endpoint URL (default empty; an empty endpoint
//!   surfaces every tick as a decode failure rather than disabling the
//!   pipeline)
//! - `REQUEST_TIMEOUT_MS` — per-call HTTP timeout (default 10000)
//! - `LOG_LEVEL` — tracing level filter (default "info")
//!
//! Variable names are matched case-insensitively by figment's `Env` provider.

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppResult, SenderError};

/// Top-level pipeline configuration, immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sampling interval in milliseconds. Must be positive.
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Decoder endpoint URL, with or without a trailing `/`.
    #[serde(default)]
    pub decoder: String,
    /// Upper bound on a single decode round trip, in milliseconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_interval() -> u64 {
    2000
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            decoder: String::new(),
            request_timeout_ms: default_request_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> AppResult<Self> {
        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::raw().only(&[
                "interval",
                "decoder",
                "request_timeout_ms",
                "log_level",
            ]))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> AppResult<()> {
        if self.interval == 0 {
            return Err(SenderError::Configuration(
                "INTERVAL must be a positive number of milliseconds".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(SenderError::Configuration(
                "REQUEST_TIMEOUT_MS must be a positive number of milliseconds".into(),
            ));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(SenderError::Configuration(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }
}
