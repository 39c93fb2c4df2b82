//! Analysis Session Integration Tests
//!
//! State machine transitions, the status channel and snapshots.

use std::time::Duration;

use appfeature_analyzer::{AnalysisSession, AnalysisStatus, AnalyzerConfig};
use appfeature_llm::LlmError;

use crate::common::{analyzer, keyed_config, memory_file, reported_file, MockLlmProvider};

/// Collect published statuses until the attempt resolves.
fn observe(session: &AnalysisSession) -> tokio::task::JoinHandle<Vec<AnalysisStatus>> {
    let mut rx = session.subscribe();
    tokio::spawn(async move {
        let mut seen = Vec::new();
        while let Ok(status) = rx.recv().await {
            seen.push(status);
            if status.is_terminal() {
                break;
            }
        }
        seen
    })
}

#[tokio::test]
async fn test_successful_attempt_reaches_completed() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockLlmProvider::replying("Overview\nA habit tracker.");
    let mut session = AnalysisSession::new(analyzer(keyed_config(), &provider));
    provider.track_status(session.subscribe());

    session
        .add_files(vec![
            reported_file(dir.path(), "part1.mp4", 50),
            reported_file(dir.path(), "part2.mp4", 50),
        ])
        .unwrap();

    let status = session.run().await.unwrap();
    assert_eq!(status, AnalysisStatus::Completed);
    assert_eq!(session.result(), Some("Overview\nA habit tracker."));
    assert_eq!(provider.status_at_call(), vec![AnalysisStatus::Analyzing]);
}

#[tokio::test]
async fn test_missing_credential_goes_to_error() {
    let provider = MockLlmProvider::replying("unused");
    let mut session = AnalysisSession::new(analyzer(AnalyzerConfig::default(), &provider));
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", b"a")])
        .unwrap();

    let status = session.run().await.unwrap();
    assert_eq!(status, AnalysisStatus::Error);
    assert_eq!(
        session.error(),
        Some("API Key is missing. Please check your environment configuration.")
    );
    assert_eq!(provider.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_status_sequence_with_settle_delay() {
    let provider = MockLlmProvider::failing(LlmError::AuthenticationFailed {
        message: "gemini (401): API_KEY_INVALID".to_string(),
    });
    let config = AnalyzerConfig {
        settle_delay_ms: 500,
        ..keyed_config()
    };
    let mut session = AnalysisSession::new(analyzer(config, &provider));
    provider.track_status(session.subscribe());
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", b"a")])
        .unwrap();

    let observer = observe(&session);
    let started = tokio::time::Instant::now();
    let status = session.run().await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(500));

    assert_eq!(status, AnalysisStatus::Error);
    assert_eq!(
        session.error(),
        Some("Authentication failed. The API Key provided is invalid or expired.")
    );
    assert_eq!(provider.status_at_call(), vec![AnalysisStatus::Analyzing]);

    let seen = observer.await.unwrap();
    assert_eq!(
        seen,
        vec![
            AnalysisStatus::Preparing,
            AnalysisStatus::Analyzing,
            AnalysisStatus::Error
        ]
    );
}

#[tokio::test]
async fn test_default_config_delivers_preparing() {
    let provider = MockLlmProvider::replying("Overview");
    let mut session = AnalysisSession::new(analyzer(keyed_config(), &provider));
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", b"a")])
        .unwrap();

    let observer = observe(&session);
    assert_eq!(session.run().await.unwrap(), AnalysisStatus::Completed);

    let seen = observer.await.unwrap();
    assert_eq!(
        seen,
        vec![
            AnalysisStatus::Preparing,
            AnalysisStatus::Analyzing,
            AnalysisStatus::Completed
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_attempt_leaves_session_usable() {
    let provider = MockLlmProvider::replying("Overview");
    let config = AnalyzerConfig {
        settle_delay_ms: 500,
        ..keyed_config()
    };
    let mut session = AnalysisSession::new(analyzer(config, &provider));
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", b"a")])
        .unwrap();

    let abandoned = tokio::time::timeout(Duration::from_millis(100), session.run()).await;
    assert!(abandoned.is_err());
    assert_eq!(session.status(), AnalysisStatus::Error);
    assert_eq!(session.error(), Some("Failed to analyze video."));
    assert_eq!(provider.calls(), 0);

    session.remove_file(0).unwrap();
    assert_eq!(session.status(), AnalysisStatus::Idle);
    session
        .add_files(vec![memory_file("b.mp4", "video/mp4", b"b")])
        .unwrap();
    assert_eq!(session.run().await.unwrap(), AnalysisStatus::Completed);
    session.start_new().unwrap();
    assert!(session.working_set().is_empty());
}

#[tokio::test]
async fn test_empty_trigger_never_leaves_idle() {
    let provider = MockLlmProvider::replying("unused");
    let mut session = AnalysisSession::new(analyzer(keyed_config(), &provider));
    let mut rx = session.subscribe();

    for _ in 0..3 {
        assert_eq!(session.run().await.unwrap(), AnalysisStatus::Idle);
    }
    assert!(rx.try_recv().is_err());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_edit_after_error_returns_to_idle() {
    let provider = MockLlmProvider::new(vec![
        Err(LlmError::ServerError {
            message: "backend unavailable".to_string(),
            status: Some(503),
        }),
        Ok(crate::common::response(Some("Overview"))),
    ]);
    let mut session = AnalysisSession::new(analyzer(keyed_config(), &provider));
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", b"a")])
        .unwrap();

    assert_eq!(session.run().await.unwrap(), AnalysisStatus::Error);
    assert_eq!(session.error(), Some("backend unavailable"));

    session
        .add_files(vec![memory_file("b.mp4", "video/mp4", b"b")])
        .unwrap();
    assert_eq!(session.status(), AnalysisStatus::Idle);
    assert!(session.error().is_none());

    assert_eq!(session.run().await.unwrap(), AnalysisStatus::Completed);
    let (parts, _, _) = provider.last_request().unwrap();
    assert_eq!(parts.len(), 3);
}

#[tokio::test]
async fn test_start_new_after_completion() {
    let provider = MockLlmProvider::replying("Overview");
    let mut session = AnalysisSession::new(analyzer(keyed_config(), &provider));
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", b"a")])
        .unwrap();
    session.set_context("Login flow").unwrap();
    session.run().await.unwrap();

    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, AnalysisStatus::Completed);
    assert_eq!(snapshot.result.as_deref(), Some("Overview"));
    assert!(snapshot.can_analyze);

    session.start_new().unwrap();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.status, AnalysisStatus::Idle);
    assert!(snapshot.parts.is_empty());
    assert!(snapshot.context.is_empty());
    assert!(snapshot.result.is_none());
    assert!(!snapshot.can_analyze);
}

#[test]
fn test_snapshot_serializes_for_presentation() {
    let provider = MockLlmProvider::replying("unused");
    let mut session = AnalysisSession::new(analyzer(keyed_config(), &provider));
    session
        .add_files(vec![memory_file("a.mp4", "video/mp4", &[0u8; 1536])])
        .unwrap();

    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["status"], "idle");
    assert_eq!(json["parts"][0]["label"], "Part 1");
    assert_eq!(json["parts"][0]["display_size"], "1.5 KB");
    assert_eq!(json["can_analyze"], true);
    assert_eq!(json["is_processing"], false);
}
