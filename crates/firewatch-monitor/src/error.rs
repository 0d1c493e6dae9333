//! Error types for the monitor binary.
//!
//! [`MonitorError`] is the top-level error type that wraps all possible
//! failure modes during startup and shutdown.

/// Top-level error for the monitor binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: firewatch_core::ConfigError,
    },

    /// The shutdown signal handler could not be installed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The API server could not start.
    #[error("API error: {message}")]
    Api {
        /// Description of the API failure.
        message: String,
    },

    /// A background task panicked or was cancelled.
    #[error("task error: {message}")]
    Task {
        /// Description of the task failure.
        message: String,
    },
}
