//! Shared test fixtures

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use appfeature_analyzer::{AnalysisStatus, AnalyzerConfig, MediaFile, VideoAnalyzer};
use appfeature_core::BYTES_PER_MB;
use appfeature_llm::{
    ContentPart, LlmError, LlmProvider, LlmRequestOptions, LlmResponse, LlmResult,
    ProviderConfig, StopReason, UsageStats,
};
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Provider that replays canned results and records what it was sent.
pub struct MockLlmProvider {
    responses: Mutex<Vec<LlmResult<LlmResponse>>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Vec<ContentPart>, Option<String>, LlmRequestOptions)>>,
    status_rx: Mutex<Option<broadcast::Receiver<AnalysisStatus>>>,
    status_at_call: Mutex<Vec<AnalysisStatus>>,
    config: ProviderConfig,
}

impl MockLlmProvider {
    pub fn new(responses: Vec<LlmResult<LlmResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            status_rx: Mutex::new(None),
            status_at_call: Mutex::new(Vec::new()),
            config: ProviderConfig::default(),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(response(Some(text)))])
    }

    pub fn failing(err: LlmError) -> Arc<Self> {
        Self::new(vec![Err(err)])
    }

    /// Record the latest published session status each time the provider is called.
    pub fn track_status(&self, rx: broadcast::Receiver<AnalysisStatus>) {
        *self.status_rx.lock().unwrap() = Some(rx);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(Vec<ContentPart>, Option<String>, LlmRequestOptions)> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn status_at_call(&self) -> Vec<AnalysisStatus> {
        self.status_at_call.lock().unwrap().clone()
    }
}

pub fn response(text: Option<&str>) -> LlmResponse {
    LlmResponse {
        content: text.map(str::to_string),
        stop_reason: StopReason::EndTurn,
        usage: UsageStats::default(),
        model: "mock-model".to_string(),
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
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
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(rx) = self.status_rx.lock().unwrap().as_mut() {
            let mut latest = None;
            while let Ok(status) = rx.try_recv() {
                latest = Some(status);
            }
            if let Some(status) = latest {
                self.status_at_call.lock().unwrap().push(status);
            }
        }
        self.requests
            .lock()
            .unwrap()
            .push((parts, system, request_options));

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(LlmError::Other {
                message: "No more mock responses available".to_string(),
            })
        } else {
            responses.remove(0)
        }
    }

    async fn health_check(&self) -> LlmResult<()> {
        Ok(())
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

pub fn keyed_config() -> AnalyzerConfig {
    AnalyzerConfig::default().with_api_key("test-key")
}

pub fn analyzer(config: AnalyzerConfig, provider: &Arc<MockLlmProvider>) -> VideoAnalyzer {
    VideoAnalyzer::with_provider(config, provider.clone())
}

/// In-memory file declaring the given media type.
pub fn memory_file(name: &str, media_type: &str, data: &[u8]) -> MediaFile {
    MediaFile::from_bytes(name, media_type, data.to_vec())
}

/// Path-backed file whose reported size is `mb` megabytes.
///
/// Only validation looks at the reported size, so the file on disk stays small.
pub fn reported_file(dir: &Path, name: &str, mb: u64) -> MediaFile {
    let path = dir.join(name);
    std::fs::write(&path, name.as_bytes()).unwrap();
    MediaFile::from_path(name, "video/mp4", path, mb * BYTES_PER_MB)
}
