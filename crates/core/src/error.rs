//! Core Error Types
//!
//! Defines the foundational error types shared by the AppFeature workspace.
//! These error types only depend on thiserror + std so the core crate stays
//! lightweight.
//!
//! The application crate wraps these in `AppError` together with
//! configuration, encoding and backend failures.

use thiserror::Error;

use crate::session::AnalysisStatus;
use crate::validation::ValidationError;

/// Core error type for the AppFeature workspace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A candidate batch of media was rejected by the validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A session operation was attempted in a state that does not allow it
    #[error("Cannot {action} while the session is {status}")]
    InvalidTransition {
        status: AnalysisStatus,
        action: &'static str,
    },

    /// Index outside the working set
    #[error("No video part at position {index} (working set has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create an invalid transition error
    pub fn invalid_transition(status: AnalysisStatus, action: &'static str) -> Self {
        Self::InvalidTransition { status, action }
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
