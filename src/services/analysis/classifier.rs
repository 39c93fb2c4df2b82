//! Error Classifier
//!
//! Maps raw inference backend failures to messages a user can act on.

use appfeature_llm::LlmError;
use serde::{Deserialize, Serialize};

use crate::utils::error::MISSING_CREDENTIAL_MESSAGE;

pub const AUTH_FAILED_MESSAGE: &str =
    "Authentication failed. The API Key provided is invalid or expired.";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str =
    "The video data is too large for the API request. Please reduce the video size or length.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during analysis.";

const AUTH_MARKERS: &[&str] = &["401", "UNAUTHENTICATED", "API_KEY_INVALID"];
const PAYLOAD_MARKERS: &[&str] = &["413", "Payload Too Large", "payload size exceeds"];

/// Category of a classified backend failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCause {
    CredentialInvalid,
    PayloadTooLarge,
    MissingCredential,
    Unclassified,
}

/// A backend failure reduced to a cause and a display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFacingError {
    pub cause: ErrorCause,
    pub message: String,
}

impl UserFacingError {
    pub fn new(cause: ErrorCause, message: impl Into<String>) -> Self {
        Self {
            cause,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for UserFacingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for UserFacingError {}

/// Classification strategy for backend failures.
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &LlmError) -> UserFacingError;
}

/// Classifies by error variant first, then by markers in the error text.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerClassifier;

impl MarkerClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl ErrorClassifier for MarkerClassifier {
    fn classify(&self, error: &LlmError) -> UserFacingError {
        match error {
            LlmError::MissingApiKey { .. } => {
                return UserFacingError::new(ErrorCause::MissingCredential, MISSING_CREDENTIAL_MESSAGE)
            }
            LlmError::AuthenticationFailed { .. } => {
                return UserFacingError::new(ErrorCause::CredentialInvalid, AUTH_FAILED_MESSAGE)
            }
            LlmError::PayloadTooLarge { .. } => {
                return UserFacingError::new(ErrorCause::PayloadTooLarge, PAYLOAD_TOO_LARGE_MESSAGE)
            }
            _ => {}
        }

        let text = error.to_string();
        if AUTH_MARKERS.iter().any(|m| text.contains(m)) {
            return UserFacingError::new(ErrorCause::CredentialInvalid, AUTH_FAILED_MESSAGE);
        }
        if PAYLOAD_MARKERS.iter().any(|m| text.contains(m)) {
            return UserFacingError::new(ErrorCause::PayloadTooLarge, PAYLOAD_TOO_LARGE_MESSAGE);
        }

        let raw = error.message().trim();
        let message = if raw.is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            raw.to_string()
        };
        UserFacingError::new(ErrorCause::Unclassified, message)
    }
}
