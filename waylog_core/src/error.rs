//! Error types for the waylog_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for waylog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form input rejected before a workout was constructed
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Position acquisition failed (denied, unsupported, no fix)
    #[error("Location error: {0}")]
    Location(String),

    /// Map widget refused an operation
    #[error("Map error: {0}")]
    Map(String),
}
