//! Shared helpers for tunescope-web integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::util::ServiceExt;
use tunescope_common::config::TomlConfig;
use tunescope_web::{build_router, AppState};

/// Serve `router` on an ephemeral localhost port, returning its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Should bind ephemeral port");
    let addr = listener.local_addr().expect("Should have local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Mock upstream failed");
    });
    format!("http://{}", addr)
}

/// Config pointing every outbound client at `base_url`
pub fn config_for(base_url: &str) -> TomlConfig {
    TomlConfig {
        video_api_url: base_url.to_string(),
        lyrics_api_url: base_url.to_string(),
        catalog_api_url: base_url.to_string(),
        request_timeout_secs: 5,
        ..TomlConfig::default()
    }
}

/// Router wired to `config`
pub fn app_with(config: TomlConfig) -> Router {
    build_router(AppState::new(config).expect("Should build app state"))
}

/// Router with compiled defaults; for tests that never reach an upstream
pub fn default_app() -> Router {
    app_with(TomlConfig::default())
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("Router should respond")
}

/// Extract JSON body from response
pub async fn extract_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
