//! Centralized error types for multipick.
//!
//! Each layer has its own `thiserror` enum; `AppError` aggregates them and
//! turns them into messages fit for the status line.

use thiserror::Error;

use crate::config::ConfigError;
use crate::filter::FilterError;
use crate::source::SourceError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The filter field could not be read from a record.
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Loading the records failed.
    #[error("{0}")]
    Source(#[from] SourceError),

    /// The terminal could not be switched into or out of raw mode.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Filter(FilterError::TypeMismatch { field, actual }) => format!(
                "Field '{}' must be a string on every record, found {}.",
                field, actual
            ),
            AppError::Source(e) => match e {
                SourceError::Network(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                SourceError::Status { status: 404, .. } => {
                    "The source URL was not found.".to_string()
                }
                SourceError::Status { status: 429, .. } => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                SourceError::Status { status, context } => {
                    format!("Server answered HTTP {}: {}", status, context)
                }
                SourceError::InvalidResponse(msg) => format!("Unexpected response: {}", msg),
                SourceError::Io(_) => {
                    "Could not read the source file. Please check the path.".to_string()
                }
                SourceError::Parse(e) => format!("Source is not a valid record list: {}", e),
            },
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
        }
    }

    /// Whether the error stops the application.
    ///
    /// A record without a string filter field means the picker cannot work at
    /// all; a failed load only leaves the list empty.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(_) | AppError::Filter(_) | AppError::Terminal(_)
        )
    }
}
