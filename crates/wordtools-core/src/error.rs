//! Error types for wordtools.

use thiserror::Error;

/// Top-level result type for wordtools operations.
pub type Result<T> = std::result::Result<T, WordToolsError>;

/// Top-level error type for wordtools.
///
/// Counting and normalization never fail; these errors only come from
/// configuration, day keys supplied from outside, and serialization.
#[derive(Debug, Error)]
pub enum WordToolsError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid day key '{key}': expected YYYY/M/D")]
    DayKey { key: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors related to loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {message}")]
    Parse { path: String, message: String },
}
