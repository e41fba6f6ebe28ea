//! Integration tests for analysis attempts and their outcomes.

mod common;

use deepguard_analysis_contract::{AnalysisResult, Verdict};
use deepguard_ui::{Effect, ErrorKind, ErrorState, SubmissionController, UiState};

#[test]
fn analysis_cycle_tests_success_produces_verdict() {
    let mut controller = SubmissionController::default();
    controller.pick_file(common::mp4_small());

    let effect = controller.begin_analysis();
    let Some(Effect::Analyze { ticket, media }) = effect else {
        panic!("expected analysis effect");
    };
    assert_eq!(media, common::mp4_small());
    assert_eq!(controller.state(), UiState::Analyzing);

    assert!(controller.analysis_finished(ticket, Ok(AnalysisResult::new(true, 85.0))));
    assert_eq!(controller.state(), UiState::Resulted);
    assert_eq!(controller.verdict(), Some(Verdict::Deepfake));
    assert!(controller.error().is_none());
}

#[test]
fn analysis_cycle_tests_failure_keeps_file_for_retry() {
    let mut controller = SubmissionController::default();
    controller.pick_file(common::mp4_small());
    let ticket = common::analysis_ticket(controller.begin_analysis());

    let failure = ErrorState::new(ErrorKind::Protocol, "model unavailable");
    assert!(controller.analysis_finished(ticket, Err(failure.clone())));

    assert_eq!(controller.state(), UiState::Errored);
    assert_eq!(controller.error(), Some(&failure));
    assert!(controller.result().is_none());
    assert!(controller.preview().is_some());
    assert!(controller.can_analyze());
}

#[test]
fn analysis_cycle_tests_retry_clears_previous_error() {
    let mut controller = SubmissionController::default();
    controller.pick_file(common::mp4_small());
    let first = common::analysis_ticket(controller.begin_analysis());
    controller.analysis_finished(first, Err(ErrorState::new(ErrorKind::Network, "offline")));

    let second = common::analysis_ticket(controller.begin_analysis());
    assert!(controller.error().is_none());
    assert!(controller.result().is_none());

    assert!(!controller.analysis_finished(first, Ok(AnalysisResult::new(false, 99.0))));
    assert!(controller.analysis_finished(second, Ok(AnalysisResult::new(false, 99.0))));
    assert_eq!(controller.verdict(), Some(Verdict::Authentic));
}

#[test]
fn analysis_cycle_tests_reanalyze_after_result_clears_it() {
    let mut controller = SubmissionController::default();
    controller.pick_file(common::mp4_small());
    let ticket = common::analysis_ticket(controller.begin_analysis());
    controller.analysis_finished(ticket, Ok(AnalysisResult::new(false, 30.0)));
    assert_eq!(controller.verdict(), Some(Verdict::Uncertain));

    common::analysis_ticket(controller.begin_analysis());
    assert!(controller.result().is_none());
    assert_eq!(controller.state(), UiState::Analyzing);
}
