//! Errors raised while loading the candidate collection.

use thiserror::Error;

/// Errors that can occur when loading records from a URL or file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {context}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL or server message.
        context: String,
    },

    /// The body was JSON but not a list of records.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Reading the source file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The body or file was not valid JSON, or a record had no id.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

impl SourceError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        SourceError::Status {
            status: status.as_u16(),
            context: context.to_string(),
        }
    }

    /// Whether retrying the request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Network(_) => true,
            SourceError::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}
