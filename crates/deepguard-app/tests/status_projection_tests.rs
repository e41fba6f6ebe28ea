//! Integration tests for status projection and text rendering.

mod common;

use deepguard_analysis_contract::AnalysisResult;
use deepguard_app::{SubmissionSession, project_status, render_status};
use deepguard_core::MediaFile;
use deepguard_ui::Effect;

#[tokio::test]
async fn status_projection_tests_renders_result_card() {
    let backend = common::FakeBackend::replying(
        200,
        r#"{"isDeepfake":false,"confidence":42.5,"message":"Deepfake confidence is 42.50%"}"#,
    );
    let mut session = SubmissionSession::new(common::client_for(&backend));
    session.pick_file(common::jpeg_2mb());
    session.settle().await;
    session.analyze();
    session.settle().await;

    let view = project_status(session.controller());
    assert_eq!(view.state, "Resulted");
    assert_eq!(view.preview.as_deref(), Some("embedded"));
    assert_eq!(view.is_deepfake, Some(false));

    let text = render_status(&view);
    assert!(text.contains("File: portrait.jpg (image/jpeg, 2097152 bytes)"));
    assert!(text.contains("Uncertain Content - Cannot Be Trusted"));
    assert!(text.contains("Confidence: 42.50%"));
    assert!(text.contains("Server: Deepfake confidence is 42.50%"));
}

#[tokio::test]
async fn status_projection_tests_json_uses_snake_case_verdict() {
    let backend = common::FakeBackend::replying(200, r#"{"isDeepfake":true,"confidence":10}"#);
    let mut session = SubmissionSession::new(common::client_for(&backend));
    session.pick_file(common::jpeg_2mb());
    session.analyze();
    session.settle().await;

    let json = serde_json::to_value(project_status(session.controller()))
        .expect("status should serialize");
    assert_eq!(json["verdict"], "low_confidence");
    assert_eq!(json["confidence"], 10.0);
    assert!(json["error"].is_null());
}

#[test]
fn status_projection_tests_empty_controller() {
    let view = project_status(&deepguard_ui::SubmissionController::default());
    assert_eq!(view.state, "Empty");
    assert_eq!(render_status(&view), "No file selected");
}

#[test]
fn status_projection_tests_rejection_shows_error_above_prior_result() {
    let mut controller = deepguard_ui::SubmissionController::default();
    controller.pick_file(MediaFile::new("clip.mp4", "video/mp4", vec![3; 64]));
    let Some(Effect::Analyze { ticket, .. }) = controller.begin_analysis() else {
        panic!("expected analysis effect");
    };
    controller.analysis_finished(ticket, Ok(AnalysisResult::new(true, 85.0)));
    controller.pick_file(MediaFile::new("huge.mp4", "video/mp4", vec![0; 11 * 1024 * 1024]));

    let text = render_status(&project_status(&controller));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "Error: File size must be less than 10MB");
    assert_eq!(lines[2], "Deepfake Detected!");
    assert_eq!(lines[3], "Confidence: 85.00%");
}
