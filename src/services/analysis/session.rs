//! Analysis Session
//!
//! Owns the working set, the user context and the session state machine, and
//! drives one attempt at a time through the analyzer. Every status
//! transition is broadcast to subscribers for presentation layers.

use std::path::PathBuf;

use appfeature_core::{
    format_bytes, AnalysisStatus, CoreError, MediaFile, SessionState, WorkingSet,
    FALLBACK_FAILURE_MESSAGE,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::encoder::media_from_path;
use super::pipeline::VideoAnalyzer;
use crate::models::analysis::{PartView, SessionSnapshot};
use crate::utils::error::AppResult;

/// Buffered transitions per subscriber before it starts lagging
const STATUS_CHANNEL_CAPACITY: usize = 64;

/// Interactive analysis session
pub struct AnalysisSession {
    analyzer: VideoAnalyzer,
    working_set: WorkingSet,
    context: String,
    state: SessionState,
    status_tx: broadcast::Sender<AnalysisStatus>,
}

impl AnalysisSession {
    pub fn new(analyzer: VideoAnalyzer) -> Self {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            analyzer,
            working_set: WorkingSet::new(),
            context: String::new(),
            state: SessionState::new(),
            status_tx,
        }
    }

    /// Receive every status transition published after this call, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> AnalysisStatus {
        self.state.status()
    }

    pub fn result(&self) -> Option<&str> {
        self.state.result()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn analyzer(&self) -> &VideoAnalyzer {
        &self.analyzer
    }

    /// Inputs are locked while an attempt is in flight.
    pub fn is_processing(&self) -> bool {
        self.state.status().is_processing()
    }

    /// Whether a trigger would start an attempt.
    pub fn can_analyze(&self) -> bool {
        !self.working_set.is_empty() && self.state.status().accepts_trigger()
    }

    /// Validate and append a batch of files.
    ///
    /// On rejection neither the working set nor the session state changes.
    /// On success a completed or failed session returns to idle.
    pub fn add_files(&mut self, batch: Vec<MediaFile>) -> AppResult<usize> {
        self.ensure_editable()?;
        let count = self.working_set.add(batch, self.analyzer.validator())?;
        self.inputs_changed()?;
        debug!(
            parts = count,
            total_bytes = self.working_set.total_size(),
            "working set updated"
        );
        Ok(count)
    }

    /// Stat each path and append them as one batch.
    pub async fn add_paths<I, P>(&mut self, paths: I) -> AppResult<usize>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.ensure_editable()?;
        let mut batch = Vec::new();
        for path in paths {
            batch.push(media_from_path(path.into()).await?);
        }
        self.add_files(batch)
    }

    /// Remove the part at `index`.
    pub fn remove_file(&mut self, index: usize) -> AppResult<MediaFile> {
        self.ensure_editable()?;
        let removed = self.working_set.remove(index)?;
        self.inputs_changed()?;
        Ok(removed)
    }

    /// Replace the context text. Does not affect a stored result.
    pub fn set_context(&mut self, context: impl Into<String>) -> AppResult<()> {
        self.ensure_editable()?;
        self.context = context.into();
        Ok(())
    }

    /// Run one analysis attempt and return the resulting status.
    ///
    /// With an empty working set nothing happens and the current status is
    /// returned. Triggering while an attempt is in flight is an error.
    ///
    /// Dropping the future before it resolves moves the session to `Error`
    /// with the fallback failure message.
    pub async fn run(&mut self) -> AppResult<AnalysisStatus> {
        if !self.state.begin(!self.working_set.is_empty())? {
            debug!("analysis trigger ignored: no video parts");
            return Ok(self.state.status());
        }

        let delay = self.analyzer.config().settle_delay();
        let mut attempt = AttemptGuard {
            state: &mut self.state,
            status_tx: &self.status_tx,
        };
        attempt.publish();

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        attempt.state.start_analyzing()?;
        attempt.publish();

        let outcome = self
            .analyzer
            .analyze(self.working_set.files(), &self.context)
            .await;
        match outcome {
            Ok(text) => attempt.state.complete(text)?,
            Err(err) => attempt.state.fail(err.to_string())?,
        }
        attempt.publish();
        drop(attempt);

        info!(status = %self.state.status(), "analysis attempt finished");
        Ok(self.state.status())
    }

    /// Discard a completed result along with its inputs.
    pub fn start_new(&mut self) -> AppResult<()> {
        self.state.start_new()?;
        self.working_set.clear();
        self.context.clear();
        self.publish();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let parts = self
            .working_set
            .part_labels()
            .into_iter()
            .zip(self.working_set.summaries())
            .map(|(label, file)| PartView {
                label,
                display_size: format_bytes(file.size),
                file,
            })
            .collect();

        SessionSnapshot {
            status: self.state.status(),
            parts,
            total_size: self.working_set.total_size(),
            context: self.context.clone(),
            result: self.state.result().map(str::to_string),
            error: self.state.error().map(str::to_string),
            can_analyze: self.can_analyze(),
            is_processing: self.is_processing(),
        }
    }

    fn ensure_editable(&self) -> AppResult<()> {
        let status = self.state.status();
        if status.is_processing() {
            return Err(CoreError::invalid_transition(status, "edit inputs").into());
        }
        Ok(())
    }

    fn inputs_changed(&mut self) -> AppResult<()> {
        let before = self.state.status();
        self.state.inputs_changed()?;
        if before != self.state.status() {
            self.publish();
        }
        Ok(())
    }

    fn publish(&self) {
        // No subscribers is not an error.
        let _ = self.status_tx.send(self.state.status());
    }
}

/// Resolves an in-flight attempt whose future was dropped.
struct AttemptGuard<'a> {
    state: &'a mut SessionState,
    status_tx: &'a broadcast::Sender<AnalysisStatus>,
}

impl AttemptGuard<'_> {
    fn publish(&self) {
        let _ = self.status_tx.send(self.state.status());
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let status = self.state.status();
        if !status.is_processing() {
            return;
        }
        warn!(%status, "analysis attempt abandoned before completion");
        if status == AnalysisStatus::Preparing && self.state.start_analyzing().is_err() {
            return;
        }
        if self.state.fail(FALLBACK_FAILURE_MESSAGE).is_ok() {
            self.publish();
        }
    }
}
