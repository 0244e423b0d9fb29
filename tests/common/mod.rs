#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use custody_ledger::api::{self, AppState};
use custody_ledger::config::AppConfig;

/// Router over a fresh, unseeded ledger
pub fn test_app() -> (Router, AppState) {
    app_with_config(AppConfig::default())
}

pub fn seeded_app() -> (Router, AppState) {
    let config = AppConfig {
        seed_demo_data: true,
        ..AppConfig::default()
    };
    app_with_config(config)
}

pub fn app_with_config(config: AppConfig) -> (Router, AppState) {
    let state = AppState::new(&config);
    (api::router(state.clone(), &config), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    send(app, request).await
}

/// Evidence-style custody fixtures: (from, to, reason)
pub fn custody_handoffs() -> Vec<(&'static str, &'static str, &'static str)> {
    vec![
        ("Officer Smith", "Evidence Custodian", "Initial intake"),
        ("Evidence Custodian", "Digital Forensics Lab", "Disk imaging"),
        ("Digital Forensics Lab", "Records Department", "Archival"),
    ]
}
