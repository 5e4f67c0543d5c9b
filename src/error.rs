//! Error types for the vulnerability scanner.

use thiserror::Error;

/// Main error type for the scanner.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("Model artifact version mismatch: expected {expected}, found {found}")]
    ModelVersion { expected: u32, found: u32 },

    #[error("Model artifacts are inconsistent: {0}")]
    ModelShape(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;

impl From<bincode::Error> for ScanError {
    fn from(err: bincode::Error) -> Self {
        ScanError::ModelLoad(err.to_string())
    }
}
