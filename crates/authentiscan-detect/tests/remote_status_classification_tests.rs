//! Integration tests mapping HTTP statuses onto the failure taxonomy.

mod common;

use authentiscan_detect::{DetectError, FailureClass, VerdictSource, classify_detect_error};
use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;

async fn status_endpoint(status: StatusCode) -> String {
    common::spawn_endpoint(Router::new().route("/v1/detect", post(move || async move { status })))
        .await
}

#[tokio::test]
async fn remote_status_classification_tests_maps_401_to_authentication() {
    let endpoint = status_endpoint(StatusCode::UNAUTHORIZED).await;
    let error = common::remote_source(&endpoint)
        .resolve(&common::image_request())
        .await
        .expect_err("401 should fail");

    assert_eq!(error, DetectError::Unauthorized);
    assert_eq!(classify_detect_error(&error), FailureClass::Authentication);
}

#[tokio::test]
async fn remote_status_classification_tests_maps_429_to_rate_limit() {
    let endpoint = status_endpoint(StatusCode::TOO_MANY_REQUESTS).await;
    let error = common::remote_source(&endpoint)
        .resolve(&common::image_request())
        .await
        .expect_err("429 should fail");

    assert_eq!(classify_detect_error(&error), FailureClass::RateLimited);
}

#[tokio::test]
async fn remote_status_classification_tests_maps_other_statuses_to_generic() {
    let endpoint = status_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
    let error = common::remote_source(&endpoint)
        .resolve(&common::image_request())
        .await
        .expect_err("500 should fail");

    assert_eq!(error, DetectError::Status(500));
    assert_eq!(classify_detect_error(&error), FailureClass::Generic);
}

#[tokio::test]
async fn remote_status_classification_tests_maps_refused_connection_to_connectivity() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    drop(listener);

    let error = common::remote_source(&format!("http://{address}/v1/detect"))
        .resolve(&common::image_request())
        .await
        .expect_err("closed port should fail");

    assert_eq!(classify_detect_error(&error), FailureClass::Connectivity);
}
