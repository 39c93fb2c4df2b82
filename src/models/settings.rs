//! Settings Models
//!
//! Analyzer configuration: credential, model selection and size ceilings.
//! Business logic receives an `AnalyzerConfig` at construction time; only
//! `from_env` and `load` look at the process environment.

use std::path::Path;
use std::time::Duration;

use appfeature_core::validation::{SizeLimits, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_MAX_TOTAL_SIZE_MB};
use appfeature_llm::types::{ProviderConfig, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Primary credential variable
pub const ENV_API_KEY: &str = "API_KEY";
/// Credential variable consulted when `API_KEY` is unset
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "APPFEATURE_MODEL";
pub const ENV_BASE_URL: &str = "APPFEATURE_BASE_URL";
pub const ENV_PROXY_URL: &str = "APPFEATURE_PROXY_URL";

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Inference API key; never written out
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Endpoint base URL override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Proxy for the inference endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
    /// Per-file ceiling in MB
    pub max_file_size_mb: u64,
    /// Aggregate ceiling in MB
    pub max_total_size_mb: u64,
    /// Pause between Preparing and Analyzing, 0 for a direct transition
    pub settle_delay_ms: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            proxy_url: None,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            max_total_size_mb: DEFAULT_MAX_TOTAL_SIZE_MB,
            settle_delay_ms: 0,
        }
    }
}

impl AnalyzerConfig {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        config.api_key = non_empty(ENV_API_KEY).or_else(|| non_empty(ENV_GEMINI_API_KEY));
        if let Some(model) = non_empty(ENV_MODEL) {
            config.model = model;
        }
        config.base_url = non_empty(ENV_BASE_URL);
        config.proxy_url = non_empty(ENV_PROXY_URL);
        config
    }

    /// Load a JSON configuration file.
    ///
    /// Missing fields take their defaults; a missing `api_key` is filled from
    /// the environment.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config = Self::from_json(&content)?;
        if !config.has_credential() {
            config.api_key = Self::from_env().api_key;
        }
        Ok(config)
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(content: &str) -> AppResult<Self> {
        let config: AnalyzerConfig = serde_json::from_str(content)?;
        config.validate().map_err(AppError::config)?;
        Ok(config)
    }

    /// Builder-style credential setter
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Whether a non-blank credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn size_limits(&self) -> SizeLimits {
        SizeLimits::new(self.max_file_size_mb, self.max_total_size_mb)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Provider configuration for the inference backend
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            proxy_url: self.proxy_url.clone(),
            ..ProviderConfig::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if self.max_file_size_mb == 0 || self.max_total_size_mb == 0 {
            return Err("size ceilings must be greater than zero".to_string());
        }

        if self.max_file_size_mb > self.max_total_size_mb {
            return Err(format!(
                "max_file_size_mb ({}) cannot exceed max_total_size_mb ({})",
                self.max_file_size_mb, self.max_total_size_mb
            ));
        }

        if self.settle_delay_ms > 10_000 {
            return Err("settle_delay_ms cannot exceed 10000".to_string());
        }

        Ok(())
    }
}
