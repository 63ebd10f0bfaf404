//! Custom error types for the application.
//!
//! This module defines the primary error type, `SenderError`, used across the
//! pipeline. Using the `thiserror` crate, it provides a centralized and
//! consistent way to handle the errors that can occur, from configuration
//! loading to sink dispatch.
//!
//! Note that decode failures are deliberately *absent* from this enum: the
//! decoder client converts every HTTP or transport failure into a structured
//! error document at its own boundary, so nothing decode-related ever
//! propagates as a process-level error.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, SenderError>;

/// The application error type.
#[derive(Error, Debug)]
pub enum SenderError {
    /// Configuration could not be loaded from the environment.
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// Configuration loaded but contains semantically invalid values.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// The HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Sending a telemetry record to the output channel failed.
    #[error("Dispatch error on '{output}': {message}")]
    Dispatch {
        /// The named output channel the send was addressed to.
        output: String,
        /// Failure description from the sink.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_error_names_the_output_channel() {
        let err = SenderError::Dispatch {
            output: "output1".into(),
            message: "hub unavailable".into(),
        };
        let text = err.to_string();
        assert!(text.contains("output1"));
        assert!(text.contains("hub unavailable"));
    }
}
