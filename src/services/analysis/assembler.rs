//! Request Assembler
//!
//! Builds the single ordered multimodal payload for one attempt.

use appfeature_llm::{ContentPart, LlmRequestOptions};

use super::encoder::EncodedPart;
use super::prompts::{build_lead_text, SYSTEM_INSTRUCTION};

/// Sampling temperature for analysis requests.
pub const ANALYSIS_TEMPERATURE: f32 = 0.2;

/// Lead text part followed by every media part in working-set order.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPayload {
    parts: Vec<ContentPart>,
    media_count: usize,
}

impl RequestPayload {
    /// All parts, lead text first
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    pub fn lead_text(&self) -> &str {
        match self.parts.first() {
            Some(ContentPart::Text { text }) => text,
            _ => "",
        }
    }

    pub fn media_count(&self) -> usize {
        self.media_count
    }

    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    pub fn temperature(&self) -> f32 {
        ANALYSIS_TEMPERATURE
    }

    /// Split into the provider call arguments.
    pub fn into_request(self) -> (Vec<ContentPart>, Option<String>, LlmRequestOptions) {
        (
            self.parts,
            Some(SYSTEM_INSTRUCTION.to_string()),
            LlmRequestOptions {
                temperature_override: Some(ANALYSIS_TEMPERATURE),
            },
        )
    }
}

/// Assemble the payload from the user context and the encoded parts.
pub fn assemble(context: &str, parts: Vec<EncodedPart>) -> RequestPayload {
    let media_count = parts.len();
    let mut content = Vec::with_capacity(media_count + 1);
    content.push(ContentPart::text(build_lead_text(context, media_count)));
    content.extend(parts.into_iter().map(EncodedPart::into_content_part));

    RequestPayload {
        parts: content,
        media_count,
    }
}
