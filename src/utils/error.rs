//! Error Handling
//!
//! Unified error types for the analyzer.
//! Uses thiserror for ergonomic error definitions.

use appfeature_core::{CoreError, ValidationError};
use thiserror::Error;

use crate::services::analysis::classifier::UserFacingError;

/// Shown when no inference credential is configured.
pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "API Key is missing. Please check your environment configuration.";

/// Shown when an attempt is started with an empty working set.
pub const NO_MEDIA_MESSAGE: &str = "No video files provided.";

/// Analyzer-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No credential configured; raised before any network call
    #[error("{}", MISSING_CREDENTIAL_MESSAGE)]
    MissingCredential,

    /// Attempt started with an empty working set
    #[error("{}", NO_MEDIA_MESSAGE)]
    NoMedia,

    /// Batch rejected by the media validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Session state machine or working set misuse
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A file's payload could not be read or encoded
    #[error("Failed to read \"{name}\": {message}")]
    Encode { name: String, message: String },

    /// Classified inference backend failure
    #[error("{0}")]
    Backend(UserFacingError),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for analyzer errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an encode error for the named file
    pub fn encode(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Encode {
            name: name.into(),
            message: msg.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<UserFacingError> for AppError {
    fn from(err: UserFacingError) -> Self {
        Self::Backend(err)
    }
}

/// Convert AppError to the message shown to the user
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
