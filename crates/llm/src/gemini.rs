//! Google Gemini Provider
//!
//! Implementation of the LlmProvider trait for the Gemini `generateContent`
//! REST API. Media travels inline (`inlineData`) inside the JSON body, so one
//! request carries the whole prompt.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::http_client::build_http_client;
use super::provider::{missing_api_key_error, parse_http_error, LlmProvider};
use super::types::{
    ContentPart, LlmError, LlmRequestOptions, LlmResponse, LlmResult, ProviderConfig, StopReason,
    UsageStats,
};

/// Default Gemini API base URL
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini provider
pub struct GeminiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        let client = build_http_client(config.proxy_url.as_deref())?;
        Ok(Self { config, client })
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config
            .base_url
            .as_deref()
            .unwrap_or(GEMINI_API_URL)
            .trim_end_matches('/')
    }

    /// `{base}/models/{model}`
    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url(), self.config.model)
    }

    /// `{base}/models/{model}:generateContent`
    fn generate_url(&self) -> String {
        format!("{}:generateContent", self.model_url())
    }

    fn api_key(&self) -> LlmResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| missing_api_key_error("gemini"))
    }

    /// Build the request body for the API
    fn build_request_body(
        &self,
        parts: &[ContentPart],
        system: Option<&str>,
        request_options: &LlmRequestOptions,
    ) -> serde_json::Value {
        let gemini_parts: Vec<serde_json::Value> =
            parts.iter().map(|p| self.part_to_gemini(p)).collect();

        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": gemini_parts,
            }],
            "generationConfig": {
                "temperature": request_options
                    .temperature_override
                    .unwrap_or(self.config.temperature),
            },
        });

        if let Some(sys) = system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": sys }]
            });
        }

        body
    }

    /// Convert a ContentPart to Gemini API format
    fn part_to_gemini(&self, part: &ContentPart) -> serde_json::Value {
        match part {
            ContentPart::Text { text } => serde_json::json!({ "text": text }),
            ContentPart::InlineData { media_type, data } => serde_json::json!({
                "inlineData": {
                    "mimeType": media_type,
                    "data": data,
                }
            }),
        }
    }

    /// Parse a response from the Gemini API
    ///
    /// Text is the concatenation of the first candidate's non-thought parts,
    /// matching what the official SDKs expose as `response.text`.
    fn parse_response(&self, response: &GeminiResponse) -> LlmResponse {
        let candidate = response.candidates.first();

        let text: String = candidate
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let stop_reason = match candidate.and_then(|c| c.finish_reason.as_deref()) {
            Some(reason) => StopReason::from(reason),
            None if response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_ref())
                .is_some() =>
            {
                StopReason::Blocked
            }
            None => StopReason::EndTurn,
        };

        let usage = response
            .usage_metadata
            .as_ref()
            .map(|u| UsageStats {
                input_tokens: u.prompt_token_count.unwrap_or(0),
                output_tokens: u.candidates_token_count.unwrap_or(0),
                thinking_tokens: u.thoughts_token_count,
            })
            .unwrap_or_default();

        LlmResponse {
            content: if text.is_empty() { None } else { Some(text) },
            stop_reason,
            usage,
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn supports_multimodal(&self) -> bool {
        true
    }

    async fn generate_content(
        &self,
        parts: Vec<ContentPart>,
        system: Option<String>,
        request_options: LlmRequestOptions,
    ) -> LlmResult<LlmResponse> {
        let api_key = self.api_key()?;

        let body = self.build_request_body(&parts, system.as_deref(), &request_options);
        let payload = serde_json::to_vec(&body).map_err(|e| LlmError::ParseError {
            message: format!("Failed to serialize request: {}", e),
        })?;

        debug!(
            model = %self.config.model,
            parts = parts.len(),
            media_parts = parts.iter().filter(|p| p.is_media()).count(),
            payload_bytes = payload.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, api_key)
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body_text = response.text().await.map_err(|e| LlmError::NetworkError {
            message: e.to_string(),
        })?;

        if status != 200 {
            warn!(status, model = %self.config.model, "generateContent request failed");
            return Err(parse_http_error(status, &body_text, "gemini"));
        }

        let gemini_response: GeminiResponse =
            serde_json::from_str(&body_text).map_err(|e| LlmError::ParseError {
                message: format!("Failed to parse response: {}", e),
            })?;

        let parsed = self.parse_response(&gemini_response);
        debug!(
            model = %parsed.model,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            stop_reason = ?parsed.stop_reason,
            "generateContent request completed"
        );
        Ok(parsed)
    }

    async fn health_check(&self) -> LlmResult<()> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(parse_http_error(status, &body, "gemini"))
        }
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

/// Gemini API response format
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    thoughts_token_count: Option<u32>,
}
