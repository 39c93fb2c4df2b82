//! AppFeature Analyzer
//!
//! Turns one or more screen-recorded demo videos of an application into a
//! structured feature specification using a multimodal model.
//! It includes:
//! - Analyzer configuration and session snapshot models
//! - The analysis pipeline (validation, encoding, request assembly, inference)
//! - An interactive session controller with a status channel
//! - Error types with user-facing messages

pub mod models;
pub mod services;
pub mod utils;

// Re-export models
pub use models::analysis::{PartView, SessionSnapshot};
pub use models::settings::AnalyzerConfig;
pub use services::analysis::{
    AnalysisSession, ErrorCause, ErrorClassifier, MarkerClassifier, UserFacingError,
    VideoAnalyzer,
};
pub use utils::error::{AppError, AppResult};

// Re-export the core media and state types callers need
pub use appfeature_core::{
    AnalysisStatus, MediaFile, MediaValidator, SizeLimits, ValidationError, WorkingSet,
};
