//! Analysis Models
//!
//! Serializable view of an analysis session for presentation layers.

use appfeature_core::{AnalysisStatus, MediaSummary};
use serde::{Deserialize, Serialize};

/// One staged video part as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartView {
    /// "Part 1", "Part 2", ...
    pub label: String,
    #[serde(flatten)]
    pub file: MediaSummary,
    /// Human-readable size, e.g. "50 MB"
    pub display_size: String,
}

/// Point-in-time view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub status: AnalysisStatus,
    pub parts: Vec<PartView>,
    pub total_size: u64,
    pub context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Trigger control enabled
    pub can_analyze: bool,
    /// Editing controls disabled
    pub is_processing: bool,
}
