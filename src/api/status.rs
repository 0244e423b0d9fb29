use axum::{extract::State, response::Json};
use serde_json::Value;

use crate::api::AppState;

pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "custody-ledger",
        "timestamp": chrono::Utc::now()
    }))
}

pub async fn status_endpoint(State(state): State<AppState>) -> Json<Value> {
    let ledger = state.status.ledger_status().await;
    let activity = state.status.activity().await;

    Json(serde_json::json!({
        "ledger": ledger,
        "activity": activity
    }))
}
