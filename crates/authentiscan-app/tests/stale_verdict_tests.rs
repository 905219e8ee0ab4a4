//! Integration tests for verdicts arriving after their run was abandoned.

mod common;

use authentiscan_app::{AnalysisOutcome, ControllerEvent};
use authentiscan_core::{AnalysisVerdict, MediaType};
use authentiscan_ui::Phase;

#[tokio::test(start_paused = true)]
async fn stale_verdict_tests_late_verdict_from_reset_run_is_ignored() {
    let source = common::ScriptedSource::new([
        common::ok_after(4_000, AnalysisVerdict::new(true, 99.0)),
        common::ok_after(1_000, AnalysisVerdict::new(false, 72.0)),
    ]);
    let mut controller = common::controller(source);

    controller
        .select_file(MediaType::Image, Some(common::cat_png()))
        .await
        .expect("selection should succeed");
    let first = controller.start_analysis().expect("first run should start");
    controller.reset();

    controller
        .select_file(MediaType::Image, Some(common::cat_png()))
        .await
        .expect("reselection should succeed");
    let second = controller.start_analysis().expect("second run should start");
    assert_ne!(first, second);

    let view = match controller.settle().await {
        Some(AnalysisOutcome::Done(view)) => view,
        other => panic!("expected second run to finish, got {other:?}"),
    };
    assert!(!view.is_ai_detected());
    assert_eq!(view.panel().confidence_percent, 72);

    let late = controller.next_event().await.expect("first verdict should arrive");
    assert!(matches!(late, ControllerEvent::Verdict { run, .. } if run == first));
    assert!(controller.handle_event(late).is_none());

    assert_eq!(controller.state().phase, Phase::Done);
    let shown = controller.surface().result().expect("second result should stay");
    assert!(!shown.is_ai_detected());
    assert_eq!(controller.surface().confidence_bar(), 72);
}

#[tokio::test(start_paused = true)]
async fn stale_verdict_tests_progress_from_old_run_is_ignored() {
    let source = common::ScriptedSource::new([common::ok_after(10_000, AnalysisVerdict::new(true, 99.0))]);
    let mut controller = common::controller(source);

    controller
        .select_file(MediaType::Image, Some(common::cat_png()))
        .await
        .expect("selection should succeed");
    let run = controller.start_analysis().expect("run should start");
    controller.reset();

    assert!(controller.handle_event(ControllerEvent::Progress { run, step: 3 }).is_none());
    assert_eq!(controller.surface().progress_percent(), 0);
    assert_eq!(controller.state().progress_percent, 0);
}
