//! Common error types for Showroom Wrapped

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Showroom Wrapped operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the service crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error (dataset files)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML decoding error (config file)
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dataset file could not be loaded
    #[error("Dataset error ({path}): {message}")]
    Dataset { path: PathBuf, message: String },
}
