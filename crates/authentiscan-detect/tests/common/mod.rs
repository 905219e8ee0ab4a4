//! Shared fixtures for detection integration tests.

use authentiscan_core::{MediaFile, MediaType};
use authentiscan_detect::{ApiKey, DetectionRequest, RemoteConfig, RemoteSource};
use axum::Router;

/// Serves `router` on an ephemeral loopback port and returns its detect URL.
#[allow(dead_code)]
pub async fn spawn_endpoint(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("loopback listener should bind");
    let address = listener.local_addr().expect("listener should have an address");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("test server should run");
    });
    format!("http://{address}/v1/detect")
}

/// Builds a remote source for `endpoint` with a fixed test key.
#[allow(dead_code)]
pub fn remote_source(endpoint: &str) -> RemoteSource {
    let key = ApiKey::new("test-key").expect("key should be valid");
    RemoteSource::new(RemoteConfig::new(endpoint, key)).expect("remote source should build")
}

/// Creates a small image request fixture.
#[allow(dead_code)]
pub fn image_request() -> DetectionRequest {
    DetectionRequest {
        media_type: MediaType::Image,
        file: MediaFile::new("cat.png", "image/png", vec![137, 80, 78, 71])
            .expect("fixture file should be valid"),
    }
}
