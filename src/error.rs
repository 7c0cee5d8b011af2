//! Error types for Sift.

use thiserror::Error;

/// The main error type for Sift operations.
#[derive(Error, Debug)]
pub enum SiftError {
    /// `aggregate` received a different number of responses than queries were built.
    #[error("Cardinality mismatch: expected {expected} responses, got {actual}")]
    CardinalityMismatch { expected: usize, actual: usize },

    /// A raw response could not be decoded into the expected shape.
    #[error("Failed to decode response #{index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid argument supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;

impl SiftError {
    /// Create a new cardinality mismatch error.
    pub fn cardinality_mismatch(expected: usize, actual: usize) -> Self {
        SiftError::CardinalityMismatch { expected, actual }
    }

    /// Create a new decode error for the response at `index`.
    pub fn decode(index: usize, source: serde_json::Error) -> Self {
        SiftError::Decode { index, source }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SiftError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        SiftError::InvalidConfig(msg.into())
    }
}
