//! Video Analysis Module
//!
//! Turns a staged set of demo video parts into a feature specification:
//! - Payload encoding (`encoder`)
//! - Instruction text (`prompts`)
//! - Request assembly (`assembler`)
//! - Backend error classification (`classifier`)
//! - Single-call inference client (`client`)
//! - Attempt pipeline (`pipeline`)
//! - Session controller (`session`)

pub mod assembler;
pub mod classifier;
pub mod client;
pub mod encoder;
pub mod pipeline;
pub mod prompts;
pub mod session;

// Re-export main types
pub use assembler::{assemble, RequestPayload, ANALYSIS_TEMPERATURE};
pub use classifier::{ErrorCause, ErrorClassifier, MarkerClassifier, UserFacingError};
pub use client::{InferenceClient, NO_ANALYSIS_MESSAGE};
pub use encoder::{encode, encode_all, media_from_path, EncodedPart};
pub use pipeline::VideoAnalyzer;
pub use prompts::{build_lead_text, SYSTEM_INSTRUCTION};
pub use session::AnalysisSession;
