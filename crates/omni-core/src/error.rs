//! Unified error types for OmniStudio activation

use thiserror::Error;

/// Unified error type for all activation operations
#[derive(Error, Debug)]
pub enum OmniError {
    // Session / precondition errors
    #[error("Session error: {0}")]
    Session(String),

    #[error("Missing required scope: {0}")]
    MissingScope(String),

    #[error("Listing query failed: {0}")]
    Query(String),

    // Browser errors
    #[error("Browser error: {0}")]
    Browser(String),

    // Compilation errors
    #[error("Compilation failed: {0}")]
    CompileFailed(String),

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using OmniError
pub type Result<T> = std::result::Result<T, OmniError>;
