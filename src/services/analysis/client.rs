//! Inference Client
//!
//! Sends one assembled payload to the provider and turns the outcome into
//! result text or a classified error.

use std::sync::Arc;

use appfeature_llm::LlmProvider;
use tracing::{debug, warn};

use super::assembler::RequestPayload;
use super::classifier::ErrorClassifier;
use crate::utils::error::{AppError, AppResult};

/// Returned when the backend succeeds without any text.
pub const NO_ANALYSIS_MESSAGE: &str = "No analysis generated.";

/// Single-call client over an `LlmProvider`.
#[derive(Clone)]
pub struct InferenceClient {
    provider: Arc<dyn LlmProvider>,
    classifier: Arc<dyn ErrorClassifier>,
    has_credential: bool,
}

impl InferenceClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        classifier: Arc<dyn ErrorClassifier>,
        has_credential: bool,
    ) -> Self {
        Self {
            provider,
            classifier,
            has_credential,
        }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Run inference for one payload.
    ///
    /// Missing credential and empty media are rejected before any network
    /// call. Exactly one request is sent otherwise.
    pub async fn infer(&self, payload: RequestPayload) -> AppResult<String> {
        if !self.has_credential {
            return Err(AppError::MissingCredential);
        }
        if payload.media_count() == 0 {
            return Err(AppError::NoMedia);
        }

        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            media_parts = payload.media_count(),
            "sending analysis request"
        );

        let (parts, system, options) = payload.into_request();
        match self.provider.generate_content(parts, system, options).await {
            Ok(response) => {
                debug!(
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    stop_reason = ?response.stop_reason,
                    "analysis response received"
                );
                Ok(response
                    .text()
                    .map(str::to_string)
                    .unwrap_or_else(|| NO_ANALYSIS_MESSAGE.to_string()))
            }
            Err(err) => {
                warn!(error = %err, "inference backend error");
                Err(AppError::Backend(self.classifier.classify(&err)))
            }
        }
    }
}
