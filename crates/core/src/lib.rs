//! AppFeature Core
//!
//! Foundational types for the AppFeature Analyzer workspace. This crate has no
//! knowledge of HTTP, inference providers or async runtimes.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `media` - Media file handles and payload sources
//! - `validation` - Size/type validator and size ceilings
//! - `working_set` - Ordered collection of staged video parts
//! - `session` - Analysis session state machine

pub mod error;
pub mod media;
pub mod session;
pub mod validation;
pub mod working_set;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Media ──────────────────────────────────────────────────────────────
pub use media::{guess_video_media_type, MediaFile, MediaSource, MediaSummary, VIDEO_MEDIA_PREFIX};

// ── Validation ─────────────────────────────────────────────────────────
pub use validation::{format_bytes, MediaValidator, SizeLimits, ValidationError, BYTES_PER_MB};

// ── Working Set ────────────────────────────────────────────────────────
pub use working_set::WorkingSet;

// ── Session State ──────────────────────────────────────────────────────
pub use session::{AnalysisStatus, SessionState, FALLBACK_FAILURE_MESSAGE};
