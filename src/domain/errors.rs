//! Domain error types
//!
//! This module defines the error hierarchy for Dropshare. Errors are
//! domain-specific and don't expose third-party types.

use std::path::PathBuf;
use thiserror::Error;

/// Main Dropshare error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum DropshareError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Search backend errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Errors reading or parsing a dropped file
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractError),

    /// Drop share enumeration errors
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Watermark state errors
    #[error("State management error: {0}")]
    State(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Search backend errors
///
/// Errors that occur when talking to the Elasticsearch REST API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Failed to reach the backend
    #[error("Failed to connect to backend: {0}")]
    ConnectionFailed(String),

    /// The backend answered with a non-success status
    #[error("Backend rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with something we could not understand
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    /// Request timed out
    #[error("Request timeout: {0}")]
    Timeout(String),
}

impl BackendError {
    /// HTTP status of a rejected request, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while turning a dropped file into records
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file could not be opened or read (often locked by a writer)
    #[error("file was probably locked {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content is not a whitespace-separated stream of JSON objects
    #[error("file has malformed content {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Index/type names could not be derived from the path
    #[error("cannot derive routing for {}: {reason}", path.display())]
    Routing { path: PathBuf, reason: String },
}

impl ExtractError {
    /// Path of the file that failed
    pub fn path(&self) -> &std::path::Path {
        match self {
            ExtractError::Open { path, .. }
            | ExtractError::Parse { path, .. }
            | ExtractError::Routing { path, .. } => path,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for DropshareError {
    fn from(err: std::io::Error) -> Self {
        DropshareError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DropshareError {
    fn from(err: serde_json::Error) -> Self {
        DropshareError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DropshareError {
    fn from(err: toml::de::Error) -> Self {
        DropshareError::Configuration(format!("TOML parse error: {err}"))
    }
}
