//! Integration tests for completions that arrive after Reset or replacement.

mod common;

use deepguard_app::SubmissionSession;
use deepguard_core::MediaFile;
use deepguard_ui::UiState;

#[tokio::test]
async fn stale_completion_tests_reset_before_response_discards_it() {
    let backend = common::FakeBackend::gated(200, r#"{"isDeepfake":true,"confidence":99}"#);
    let mut session = SubmissionSession::new(common::client_for(&backend));

    session.pick_file(common::jpeg_2mb());
    session.settle().await;
    assert!(session.analyze());

    session.reset();
    backend.release();
    session.settle().await;

    assert_eq!(session.pending(), 0);
    assert_eq!(session.controller().state(), UiState::Empty);
    assert!(session.controller().result().is_none());
    assert!(session.controller().error().is_none());
}

#[tokio::test]
async fn stale_completion_tests_reset_discards_late_failure() {
    let backend = common::FakeBackend::gated(503, r#"{"detail":"overloaded"}"#);
    let mut session = SubmissionSession::new(common::client_for(&backend));

    session.pick_file(common::jpeg_2mb());
    session.analyze();
    session.reset();
    backend.release();
    session.settle().await;

    assert!(session.controller().error().is_none());
    assert_eq!(session.controller().registry().live_count(), 0);
}

#[tokio::test]
async fn stale_completion_tests_new_file_supersedes_pending_analysis() {
    let backend = common::FakeBackend::gated(200, r#"{"isDeepfake":true,"confidence":99}"#);
    let mut session = SubmissionSession::new(common::client_for(&backend));

    session.pick_file(common::jpeg_2mb());
    session.analyze();
    session.pick_file(MediaFile::new("next.mp4", "video/mp4", vec![1; 256]));

    backend.release();
    session.settle().await;

    assert_eq!(session.controller().state(), UiState::Ready);
    assert_eq!(
        session.controller().media().map(MediaFile::name),
        Some("next.mp4")
    );
    assert!(session.controller().result().is_none());
}
