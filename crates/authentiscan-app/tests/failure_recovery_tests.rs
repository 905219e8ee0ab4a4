//! Integration tests for failed verdict requests returning to idle.

mod common;

use authentiscan_app::AnalysisError;
use authentiscan_core::{AnalysisVerdict, MediaType};
use authentiscan_detect::{DetectError, FailureClass};
use authentiscan_ui::{Phase, ToastLevel};

#[tokio::test(start_paused = true)]
async fn failure_recovery_tests_401_shows_auth_message_and_keeps_selection() {
    let source = common::ScriptedSource::new([
        common::err_after(400, DetectError::Unauthorized),
        common::ok_after(400, AnalysisVerdict::new(true, 91.0)),
    ]);
    let mut controller = common::controller(source.clone());

    controller
        .select_file(MediaType::Image, Some(common::cat_png()))
        .await
        .expect("selection should succeed");
    let error = controller.analyze().await.expect_err("401 should fail");

    assert_eq!(error, AnalysisError::AuthFailure);
    let state = controller.state();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(
        state.uploaded_file.as_ref().map(|selection| selection.file.name.as_str()),
        Some("cat.png")
    );

    let surface = controller.surface();
    assert!(!surface.loader_visible());
    assert!(surface.result().is_none());
    let toast = surface.toasts().last().expect("error toast should be shown");
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, FailureClass::Authentication.user_message());

    let view = controller.analyze().await.expect("retry should succeed");
    assert_eq!(view.panel().confidence_text, "91%");

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].file, requests[1].file);
}

#[tokio::test(start_paused = true)]
async fn failure_recovery_tests_each_failure_class_has_its_own_toast() {
    let cases = [
        (
            DetectError::Connect("connection refused".to_string()),
            AnalysisError::NetworkUnreachable,
            FailureClass::Connectivity,
        ),
        (
            DetectError::RateLimited,
            AnalysisError::RateLimited,
            FailureClass::RateLimited,
        ),
        (
            DetectError::Status(502),
            AnalysisError::GenericApiFailure(DetectError::Status(502).to_string()),
            FailureClass::Generic,
        ),
        (
            DetectError::Malformed("expected value".to_string()),
            AnalysisError::MalformedResponse("expected value".to_string()),
            FailureClass::Generic,
        ),
    ];

    for (detect_error, expected, class) in cases {
        let source = common::ScriptedSource::new([common::err_after(250, detect_error)]);
        let mut controller = common::controller(source);
        controller
            .select_file(MediaType::Image, Some(common::cat_png()))
            .await
            .expect("selection should succeed");

        let error = controller.analyze().await.expect_err("run should fail");
        assert_eq!(error, expected);
        assert_eq!(controller.state().phase, Phase::Idle);
        assert!(controller.state().uploaded_file.is_some());
        assert_eq!(
            controller.surface().toasts().last().map(|toast| toast.message.as_str()),
            Some(class.user_message())
        );
        assert_eq!(controller.surface().progress_percent(), 0);
    }
}
