//! Integration tests for the remote request shape and response mapping.

mod common;

use std::sync::{Arc, Mutex};

use authentiscan_core::FactorKey;
use authentiscan_detect::{DetectError, FailureClass, VerdictSource, classify_detect_error};
use axum::Router;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::routing::post;

#[derive(Debug, Default, Clone)]
struct Captured {
    authorization: Option<String>,
    idempotency_key: Option<String>,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[tokio::test]
async fn remote_verdict_mapping_tests_sends_bearer_multipart_and_maps_aliases() {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let sink = Arc::clone(&captured);
    let router = Router::new().route(
        "/v1/detect",
        post(move |headers: HeaderMap, body: Bytes| {
            let sink = Arc::clone(&sink);
            async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string)
                };
                let mut slot = sink.lock().expect("capture lock should work");
                slot.authorization = header("authorization");
                slot.idempotency_key = header("x-idempotency-key");
                slot.content_type = header("content-type");
                slot.body = body.to_vec();
                r#"{"isAI":true,"score":0.934,"analysis":{"noise":"Uniform noise floor","neural":0.97}}"#
            }
        }),
    );
    let endpoint = common::spawn_endpoint(router).await;
    let request = common::image_request();

    let verdict = common::remote_source(&endpoint)
        .resolve(&request)
        .await
        .expect("verdict should map");

    assert!(verdict.is_ai_generated);
    assert_eq!(verdict.display_percent(), 93);
    assert_eq!(
        verdict.factors.get(&FactorKey::NoisePattern).map(String::as_str),
        Some("Uniform noise floor")
    );
    assert_eq!(
        verdict.factors.get(&FactorKey::NeuralScore).map(String::as_str),
        Some("0.97")
    );
    assert!(!verdict.factors.contains_key(&FactorKey::Metadata));

    let seen = captured.lock().expect("capture lock should work").clone();
    assert_eq!(seen.authorization.as_deref(), Some("Bearer test-key"));
    assert_eq!(
        seen.idempotency_key,
        Some(request.file.fingerprint(request.media_type))
    );
    assert!(
        seen.content_type
            .as_deref()
            .is_some_and(|value| value.starts_with("multipart/form-data"))
    );
    let body = String::from_utf8_lossy(&seen.body);
    assert!(body.contains("name=\"file\"; filename=\"cat.png\""));
    assert!(body.contains("name=\"type\""));
    assert!(body.contains("image"));
}

#[tokio::test]
async fn remote_verdict_mapping_tests_treats_non_json_body_as_malformed() {
    let router = Router::new().route("/v1/detect", post(|| async { "<html>maintenance</html>" }));
    let endpoint = common::spawn_endpoint(router).await;

    let error = common::remote_source(&endpoint)
        .resolve(&common::image_request())
        .await
        .expect_err("html body should fail");

    assert!(matches!(error, DetectError::Malformed(_)));
    assert_eq!(classify_detect_error(&error), FailureClass::Generic);
}
