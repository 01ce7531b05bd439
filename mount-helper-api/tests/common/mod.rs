//! Common test utilities and helpers for mount-helper-api tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use mount_helper_api::{create_app, AppState};
use mount_helper_core::test_utils::FakeExecutor;
use mount_helper_core::LogCollectorConfig;
use std::path::Path;
use std::sync::Arc;

pub const MOUNT_BODY: &str =
    r#"{"stagingTargetPath": "/staging", "targetPath": "/target", "fsType": "ibmshare", "requestID": "123"}"#;

/// Create a test app backed by `executor`, writing debug logs below `log_dir`
pub fn create_test_app(executor: Arc<FakeExecutor>, log_dir: &Path) -> Router {
    let logs = LogCollectorConfig {
        log_dir: log_dir.to_path_buf(),
        ..LogCollectorConfig::default()
    };
    create_app(AppState::new(executor, logs))
}

/// Build a request with a raw body and no content type, like a minimal client would send
pub fn raw_request(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to extract JSON body from axum response
pub async fn extract_json_body<T>(response: axum::response::Response) -> T
where
    T: serde::de::DeserializeOwned,
{
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");

    serde_json::from_slice(&body).expect("Failed to deserialize JSON")
}
