//! LLM Provider Trait
//!
//! Defines the common interface for multimodal inference providers.

use async_trait::async_trait;

use super::types::{ContentPart, LlmError, LlmRequestOptions, LlmResponse, LlmResult, ProviderConfig};

/// Trait that all inference providers must implement.
///
/// Provides a unified interface for:
/// - Single-turn multimodal generation (generate_content)
/// - Health checking
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Returns the provider name for identification.
    fn name(&self) -> &'static str;

    /// Returns the current model being used.
    fn model(&self) -> &str;

    /// Returns whether this provider accepts inline media parts.
    fn supports_multimodal(&self) -> bool {
        false // Default: text-only
    }

    /// Send one user turn made of ordered parts and get a complete response.
    ///
    /// # Arguments
    /// * `parts` - Ordered text and inline media parts
    /// * `system` - Optional system instruction
    /// * `request_options` - Per-request overrides
    ///
    /// # Returns
    /// Complete response from the model. Exactly one request is sent; there
    /// are no retries.
    async fn generate_content(
        &self,
        parts: Vec<ContentPart>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse>;

    /// Check if the provider is reachable and the API key is accepted.
    async fn health_check(&self) -> LlmResult<()>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;
}

/// Helper function to create an error for missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::MissingApiKey {
        provider: provider.to_string(),
    }
}

/// Pull a readable message out of a Google-style error body.
///
/// `{"error": {"code": 400, "message": "...", "status": "INVALID_ARGUMENT",
/// "details": [{"reason": "API_KEY_INVALID"}]}}` becomes
/// `INVALID_ARGUMENT: ... (API_KEY_INVALID)`. Bodies in any other shape are
/// returned as-is.
pub fn extract_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    let Some(error) = value.get("error") else {
        return body.trim().to_string();
    };

    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default();
    let mut text = match error.get("status").and_then(|s| s.as_str()) {
        Some(status) if !message.is_empty() => format!("{}: {}", status, message),
        Some(status) => status.to_string(),
        None => message.to_string(),
    };

    let reasons: Vec<&str> = error
        .get("details")
        .and_then(|d| d.as_array())
        .map(|details| {
            details
                .iter()
                .filter_map(|d| d.get("reason").and_then(|r| r.as_str()))
                .collect()
        })
        .unwrap_or_default();
    if !reasons.is_empty() {
        text.push_str(&format!(" ({})", reasons.join(", ")));
    }

    if text.is_empty() {
        body.trim().to_string()
    } else {
        text
    }
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(status: u16, body: &str, provider: &str) -> LlmError {
    let message = extract_error_message(body);
    match status {
        401 | 403 => LlmError::AuthenticationFailed {
            message: format!("{} ({}): {}", provider, status, message),
        },
        404 => LlmError::ModelNotFound { model: message },
        413 => LlmError::PayloadTooLarge {
            message: format!("{} (413 Payload Too Large): {}", provider, message),
        },
        429 => LlmError::RateLimited {
            message,
            retry_after: None,
        },
        400 => LlmError::InvalidRequest { message },
        500..=599 => LlmError::ServerError {
            message,
            status: Some(status),
        },
        _ => LlmError::Other {
            message: format!("HTTP {}: {}", status, message),
        },
    }
}
