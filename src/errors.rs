//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the law-links service, providing error
//! types and conversion utilities for all system components.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from various system components
//! - **Output**: Structured error types with context
//! - **Error Categories**: Configuration, AliasData, Api, Internal
//!
//! Every failure here is a startup-time configuration failure; detection
//! itself is a pure transform and never fails at request time.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, DetectError>;

/// Error types for the law-links service
#[derive(Debug, Error)]
pub enum DetectError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Alias source data errors (malformed file, bad mapping shape)
    #[error("Failed to load alias data from {source_path}: {details}")]
    AliasData {
        source_path: String,
        details: String,
    },

    /// Validation errors
    #[error("Validation failed for field '{field}': {reason}")]
    ValidationFailed { field: String, reason: String },

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DetectError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            DetectError::Config { .. } | DetectError::Toml(_) => "configuration",
            DetectError::AliasData { .. } | DetectError::Json(_) => "alias_data",
            DetectError::ValidationFailed { .. } => "validation",
            DetectError::Internal { .. } => "internal",
        }
    }
}

impl From<std::io::Error> for DetectError {
    fn from(err: std::io::Error) -> Self {
        DetectError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}
