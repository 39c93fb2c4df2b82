//! Session State Machine
//!
//! Tracks the lifecycle of one analysis attempt:
//!
//! ```text
//! Idle ──trigger──▶ Preparing ──settle──▶ Analyzing ──ok──▶ Completed
//!  ▲                                          │
//!  │                                          └──err──▶ Error
//!  └──── inputs edited / start new analysis ◀── Completed | Error
//! ```
//!
//! Exclusivity is a precondition of `begin`: a trigger is rejected while an
//! attempt is Preparing or Analyzing.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Message stored when a failure carries no message of its own.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Failed to analyze video.";

/// Status of the current analysis session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Idle,
    /// Attempt accepted, media not yet dispatched
    Preparing,
    /// Encoding media and waiting on the backend
    Analyzing,
    Completed,
    Error,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Idle => write!(f, "idle"),
            AnalysisStatus::Preparing => write!(f, "preparing"),
            AnalysisStatus::Analyzing => write!(f, "analyzing"),
            AnalysisStatus::Completed => write!(f, "completed"),
            AnalysisStatus::Error => write!(f, "error"),
        }
    }
}

impl AnalysisStatus {
    /// An attempt is in flight; inputs must be disabled.
    pub fn is_processing(&self) -> bool {
        matches!(self, AnalysisStatus::Preparing | AnalysisStatus::Analyzing)
    }

    /// A new attempt may be triggered from this status.
    pub fn accepts_trigger(&self) -> bool {
        matches!(
            self,
            AnalysisStatus::Idle | AnalysisStatus::Completed | AnalysisStatus::Error
        )
    }

    /// The last attempt has resolved.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Error)
    }
}

/// Current status plus the outcome of the last attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    status: AnalysisStatus,
    result: Option<String>,
    error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status: AnalysisStatus::Idle,
            result: None,
            error: None,
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        self.status
    }

    /// Markdown result of the last completed attempt
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Message of the last failed attempt
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Trigger an analysis attempt.
    ///
    /// Returns `Ok(false)` without changing state when there is no media to
    /// analyze, and an error when an attempt is already in flight.
    pub fn begin(&mut self, has_media: bool) -> CoreResult<bool> {
        if !self.status.accepts_trigger() {
            return Err(CoreError::invalid_transition(
                self.status,
                "start an analysis",
            ));
        }
        if !has_media {
            return Ok(false);
        }
        self.status = AnalysisStatus::Preparing;
        self.error = None;
        Ok(true)
    }

    /// Preparing -> Analyzing
    pub fn start_analyzing(&mut self) -> CoreResult<()> {
        self.require(AnalysisStatus::Preparing, "start analyzing")?;
        self.status = AnalysisStatus::Analyzing;
        Ok(())
    }

    /// Analyzing -> Completed, storing the result.
    pub fn complete(&mut self, result: String) -> CoreResult<()> {
        self.require(AnalysisStatus::Analyzing, "complete an analysis")?;
        self.status = AnalysisStatus::Completed;
        self.result = Some(result);
        self.error = None;
        Ok(())
    }

    /// Analyzing -> Error, storing the message.
    pub fn fail(&mut self, message: impl Into<String>) -> CoreResult<()> {
        self.require(AnalysisStatus::Analyzing, "fail an analysis")?;
        let message = message.into();
        self.status = AnalysisStatus::Error;
        self.result = None;
        self.error = Some(if message.trim().is_empty() {
            FALLBACK_FAILURE_MESSAGE.to_string()
        } else {
            message
        });
        Ok(())
    }

    /// The user edited the working set or context.
    ///
    /// Completed/Error fall back to Idle and drop the stored outcome; Idle is
    /// unchanged. Edits are rejected while an attempt is in flight.
    pub fn inputs_changed(&mut self) -> CoreResult<()> {
        if self.status.is_processing() {
            return Err(CoreError::invalid_transition(self.status, "edit inputs"));
        }
        self.clear_outcome();
        Ok(())
    }

    /// "Start new analysis": Completed -> Idle.
    ///
    /// The caller clears the working set and context alongside.
    pub fn start_new(&mut self) -> CoreResult<()> {
        self.require(AnalysisStatus::Completed, "start a new analysis")?;
        self.clear_outcome();
        Ok(())
    }

    fn clear_outcome(&mut self) {
        self.status = AnalysisStatus::Idle;
        self.result = None;
        self.error = None;
    }

    fn require(&self, status: AnalysisStatus, action: &'static str) -> CoreResult<()> {
        if self.status == status {
            Ok(())
        } else {
            Err(CoreError::invalid_transition(self.status, action))
        }
    }
}
