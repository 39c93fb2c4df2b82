//! Analysis Pipeline Integration Tests
//!
//! Encoding, request assembly, single-call inference and error
//! classification through `VideoAnalyzer::analyze`.

use appfeature_analyzer::services::analysis::{
    assemble, encode, encode_all, ANALYSIS_TEMPERATURE, NO_ANALYSIS_MESSAGE, SYSTEM_INSTRUCTION,
};
use appfeature_analyzer::{AnalyzerConfig, AppError, ErrorCause, MediaFile};
use appfeature_llm::{ContentPart, LlmError};

use crate::common::{analyzer, keyed_config, memory_file, response, MockLlmProvider};

fn lead_text(parts: &[ContentPart]) -> &str {
    match parts.first() {
        Some(ContentPart::Text { text }) => text,
        other => panic!("expected lead text part, got {:?}", other),
    }
}

// ============================================================================
// Encoding
// ============================================================================

#[tokio::test]
async fn test_base64_round_trip_is_exact() {
    let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
    let file = memory_file("clip.mp4", "video/mp4", &data);

    let part = encode(&file).await.unwrap();
    assert_eq!(part.media_type, "video/mp4");
    assert!(!part.data.starts_with("data:"));
    assert_eq!(part.decode().unwrap(), data);
}

#[tokio::test]
async fn test_media_type_preserved_exactly() {
    let file = memory_file("screen.mov", "video/quicktime", b"qt");
    let parts = encode_all(&[file]).await.unwrap();
    assert_eq!(parts[0].media_type, "video/quicktime");
}

// ============================================================================
// Request assembly
// ============================================================================

#[tokio::test]
async fn test_assembled_payload_shape() {
    let files = vec![
        memory_file("a.mp4", "video/mp4", b"a"),
        memory_file("b.webm", "video/webm", b"b"),
        memory_file("c.mp4", "video/mp4", b"c"),
    ];
    let payload = assemble("", encode_all(&files).await.unwrap());

    assert_eq!(payload.parts().len(), 4);
    assert_eq!(payload.media_count(), 3);
    assert!(payload.lead_text().contains("3 video part(s)"));
    assert_eq!(payload.system_instruction(), SYSTEM_INSTRUCTION);
    assert!((payload.temperature() - ANALYSIS_TEMPERATURE).abs() < f32::EPSILON);
    assert_eq!(payload.parts()[2], ContentPart::inline_data("video/webm", "Yg=="));
}

// ============================================================================
// Analyze
// ============================================================================

#[tokio::test]
async fn test_two_parts_without_context() {
    let dir = tempfile::tempdir().unwrap();
    let provider = MockLlmProvider::replying("Overview\n...");
    let analyzer = analyzer(keyed_config(), &provider);

    let files = vec![
        crate::common::reported_file(dir.path(), "part1.mp4", 50),
        crate::common::reported_file(dir.path(), "part2.mp4", 50),
    ];
    let result = analyzer.analyze(&files, "").await.unwrap();
    assert_eq!(result, "Overview\n...");
    assert_eq!(provider.calls(), 1);

    let (parts, system, options) = provider.last_request().unwrap();
    assert_eq!(parts.len(), 3);
    assert_eq!(
        lead_text(&parts),
        "Analyze the attached 2 video part(s) as a continuous demonstration of the app. Identify all features and flows."
    );
    assert_eq!(system.as_deref(), Some(SYSTEM_INSTRUCTION));
    assert_eq!(options.temperature_override, Some(0.2));
}

#[tokio::test]
async fn test_context_changes_lead_text() {
    let provider = MockLlmProvider::new(vec![
        Ok(response(Some("first"))),
        Ok(response(Some("second"))),
    ]);
    let analyzer = analyzer(keyed_config(), &provider);
    let files = vec![memory_file("a.mp4", "video/mp4", b"a")];

    analyzer.analyze(&files, "").await.unwrap();
    let (without, _, _) = provider.last_request().unwrap();

    analyzer.analyze(&files, "Part 2 of 3").await.unwrap();
    let (with, _, _) = provider.last_request().unwrap();

    assert_ne!(lead_text(&without), lead_text(&with));
    assert!(lead_text(&with).starts_with("Context provided by user: \"Part 2 of 3\"."));
    assert!(lead_text(&with).contains("1 video part(s)"));
}

#[tokio::test]
async fn test_missing_credential_makes_no_calls() {
    let provider = MockLlmProvider::replying("unused");
    let analyzer = analyzer(AnalyzerConfig::default(), &provider);

    let err = analyzer
        .analyze(&[memory_file("a.mp4", "video/mp4", b"a")], "")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingCredential));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_empty_response_text() {
    let provider = MockLlmProvider::new(vec![Ok(response(Some("")))]);
    let analyzer = analyzer(keyed_config(), &provider);

    let result = analyzer
        .analyze(&[memory_file("a.mp4", "video/mp4", b"a")], "")
        .await
        .unwrap();
    assert_eq!(result, NO_ANALYSIS_MESSAGE);
}

#[tokio::test]
async fn test_unreadable_file_aborts_before_request() {
    let provider = MockLlmProvider::replying("unused");
    let analyzer = analyzer(keyed_config(), &provider);

    let files = vec![
        memory_file("a.mp4", "video/mp4", b"a"),
        MediaFile::from_path("lost.mp4", "video/mp4", "/nonexistent/lost.mp4", 1),
    ];
    let err = analyzer.analyze(&files, "").await.unwrap_err();
    assert!(err.to_string().contains("lost.mp4"));
    assert_eq!(provider.calls(), 0);
}

// ============================================================================
// Error classification
// ============================================================================

async fn classified(err: LlmError) -> (ErrorCause, String) {
    let provider = MockLlmProvider::failing(err);
    let analyzer = analyzer(keyed_config(), &provider);
    match analyzer
        .analyze(&[memory_file("a.mp4", "video/mp4", b"a")], "")
        .await
    {
        Err(AppError::Backend(e)) => (e.cause, e.message),
        other => panic!("expected backend error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_backend_errors_are_classified() {
    let (cause, message) = classified(LlmError::AuthenticationFailed {
        message: "gemini (401): UNAUTHENTICATED".to_string(),
    })
    .await;
    assert_eq!(cause, ErrorCause::CredentialInvalid);
    assert_eq!(
        message,
        "Authentication failed. The API Key provided is invalid or expired."
    );

    let (cause, message) = classified(LlmError::InvalidRequest {
        message: "Request payload size exceeds the limit".to_string(),
    })
    .await;
    assert_eq!(cause, ErrorCause::PayloadTooLarge);
    assert_eq!(
        message,
        "The video data is too large for the API request. Please reduce the video size or length."
    );

    let (cause, message) = classified(LlmError::RateLimited {
        message: "RESOURCE_EXHAUSTED: quota".to_string(),
        retry_after: None,
    })
    .await;
    assert_eq!(cause, ErrorCause::Unclassified);
    assert_eq!(message, "RESOURCE_EXHAUSTED: quota");

    let (cause, message) = classified(LlmError::Other {
        message: String::new(),
    })
    .await;
    assert_eq!(cause, ErrorCause::Unclassified);
    assert_eq!(message, "An unexpected error occurred during analysis.");
}
