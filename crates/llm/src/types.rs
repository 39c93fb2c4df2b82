//! LLM Types
//!
//! Core types for multimodal inference provider interactions.

use serde::{Deserialize, Serialize};

/// Default Gemini model for video understanding.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for an inference provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key; never serialized
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Base URL override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Temperature used when a request does not override it
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Proxy URL, e.g. `socks5://127.0.0.1:1080`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

fn default_temperature() -> f32 {
    1.0
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: default_temperature(),
            proxy_url: None,
        }
    }
}

/// Per-request options for provider behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmRequestOptions {
    /// Optional temperature override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_override: Option<f32>,
}

/// One ordered part of a user turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text
    Text { text: String },
    /// Binary media embedded as base64
    InlineData { media_type: String, data: String },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn inline_data(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, ContentPart::InlineData { .. })
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    /// Number of input/prompt tokens
    pub input_tokens: u32,
    /// Number of output/completion tokens
    pub output_tokens: u32,
    /// Number of thinking/reasoning tokens (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_tokens: Option<u32>,
}

impl UsageStats {
    /// Total tokens used
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens + self.thinking_tokens.unwrap_or(0)
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// Hit max tokens limit
    MaxTokens,
    /// Output withheld by a safety or recitation filter
    Blocked,
    /// Other/unknown reason
    Other(String),
}

impl From<&str> for StopReason {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "STOP" | "END_TURN" => StopReason::EndTurn,
            "MAX_TOKENS" => StopReason::MaxTokens,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
                StopReason::Blocked
            }
            _ => StopReason::Other(s.to_string()),
        }
    }
}

/// Response from an inference provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Text content of the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Why the response ended
    pub stop_reason: StopReason,
    /// Token usage statistics
    pub usage: UsageStats,
    /// The model that generated the response
    pub model: String,
}

impl LlmResponse {
    /// Response text, treating an empty string as absent.
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|t| !t.is_empty())
    }
}

/// Error types for inference operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmError {
    /// No API key configured; raised before any request is sent
    MissingApiKey { provider: String },
    /// Authentication failed (invalid API key)
    AuthenticationFailed { message: String },
    /// Request body rejected as too large
    PayloadTooLarge { message: String },
    /// Rate limit exceeded
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    NetworkError { message: String },
    /// Response parsing error
    ParseError { message: String },
    /// Other error
    Other { message: String },
}

impl LlmError {
    /// The backend's own message, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            LlmError::MissingApiKey { provider } => provider,
            LlmError::ModelNotFound { model } => model,
            LlmError::AuthenticationFailed { message }
            | LlmError::PayloadTooLarge { message }
            | LlmError::RateLimited { message, .. }
            | LlmError::InvalidRequest { message }
            | LlmError::ServerError { message, .. }
            | LlmError::NetworkError { message }
            | LlmError::ParseError { message }
            | LlmError::Other { message } => message,
        }
    }
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::MissingApiKey { provider } => {
                write!(f, "API key not configured for {}", provider)
            }
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::PayloadTooLarge { message } => {
                write!(f, "Payload too large: {}", message)
            }
            LlmError::RateLimited { message, .. } => {
                write!(f, "Rate limited: {}", message)
            }
            LlmError::ModelNotFound { model } => {
                write!(f, "Model not found: {}", model)
            }
            LlmError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            LlmError::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            LlmError::Other { message } => {
                write!(f, "Error: {}", message)
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type for inference operations
pub type LlmResult<T> = Result<T, LlmError>;
