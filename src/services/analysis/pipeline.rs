//! Analysis Pipeline
//!
//! One attempt end to end: credential and media preconditions, concurrent
//! encoding, request assembly, a single inference call.

use std::sync::Arc;

use appfeature_core::{MediaFile, MediaValidator};
use appfeature_llm::{GeminiProvider, LlmProvider};
use tracing::{info, warn};

use super::assembler::assemble;
use super::classifier::{ErrorClassifier, MarkerClassifier};
use super::client::InferenceClient;
use super::encoder::encode_all;
use crate::models::settings::AnalyzerConfig;
use crate::utils::error::{AppError, AppResult};

/// Entry point for analyzing a set of video parts.
pub struct VideoAnalyzer {
    config: AnalyzerConfig,
    client: InferenceClient,
    validator: MediaValidator,
}

impl VideoAnalyzer {
    /// Create an analyzer backed by the Gemini provider.
    pub fn new(config: AnalyzerConfig) -> AppResult<Self> {
        let provider = GeminiProvider::new(config.provider_config())
            .map_err(|e| AppError::config(e.to_string()))?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Create an analyzer over an arbitrary provider.
    pub fn with_provider(config: AnalyzerConfig, provider: Arc<dyn LlmProvider>) -> Self {
        let client = InferenceClient::new(
            provider,
            Arc::new(MarkerClassifier::new()),
            config.has_credential(),
        );
        let validator = MediaValidator::new(config.size_limits());
        Self {
            config,
            client,
            validator,
        }
    }

    /// Replace the backend error classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn ErrorClassifier>) -> Self {
        self.client = InferenceClient::new(
            self.client.provider().clone(),
            classifier,
            self.config.has_credential(),
        );
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Validator configured with this analyzer's size ceilings
    pub fn validator(&self) -> &MediaValidator {
        &self.validator
    }

    /// Analyze `files` as one continuous demonstration.
    ///
    /// Returns the feature specification markdown, or an error whose display
    /// text is the message to show the user.
    pub async fn analyze(&self, files: &[MediaFile], context: &str) -> AppResult<String> {
        let attempt_id = uuid::Uuid::new_v4().to_string();

        if !self.config.has_credential() {
            warn!(attempt_id = %attempt_id, "analysis attempted without a credential");
            return Err(AppError::MissingCredential);
        }
        if files.is_empty() {
            return Err(AppError::NoMedia);
        }

        let total_bytes = files
            .iter()
            .fold(0u64, |acc, file| acc.saturating_add(file.size()));
        let has_context = !context.trim().is_empty();
        info!(
            attempt_id = %attempt_id,
            parts = files.len(),
            total_bytes,
            has_context,
            "starting video analysis"
        );

        let encoded = encode_all(files).await.map_err(|e| {
            warn!(attempt_id = %attempt_id, error = %e, "encoding failed");
            e
        })?;
        let payload = assemble(context, encoded);

        match self.client.infer(payload).await {
            Ok(text) => {
                info!(attempt_id = %attempt_id, result_chars = text.len(), "analysis completed");
                Ok(text)
            }
            Err(e) => {
                warn!(attempt_id = %attempt_id, error = %e, "analysis failed");
                Err(e)
            }
        }
    }
}
