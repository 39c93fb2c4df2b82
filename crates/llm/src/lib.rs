//! AppFeature LLM
//!
//! Provides a provider-agnostic interface for single-turn multimodal inference
//! and its Google Gemini implementation:
//! - `LlmProvider` trait and HTTP error mapping
//! - Request/response/error types
//! - `GeminiProvider` (`generateContent` with inline media)
//! - HTTP client factory with proxy support

pub mod gemini;
pub mod http_client;
pub mod provider;
pub mod types;

// Re-export main types
pub use gemini::GeminiProvider;
pub use http_client::build_http_client;
pub use provider::LlmProvider;
pub use types::*;
