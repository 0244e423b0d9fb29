use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::AppState;
use crate::custody::CustodyEvent;
use crate::error::{require_non_empty, Result};
use crate::fingerprint::{self, compute_fingerprint};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub evidence_fingerprint: String,
    #[serde(default)]
    pub from_custodian: String,
    #[serde(default)]
    pub to_custodian: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub evidence_fingerprint: String,
    pub current_custodian: Option<String>,
    pub events: Vec<CustodyEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FingerprintResponse {
    pub fingerprint: String,
    pub size: usize,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub expected: String,
}

/// Result of re-hashing an upload against a recorded fingerprint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub expected_hash: String,
    pub current_hash: String,
    pub matches: bool,
    pub size: usize,
}

pub async fn record_transfer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<CustodyEvent>> {
    let Json(req) = payload?;
    let event = state
        .custody
        .record_transfer(
            &req.evidence_fingerprint,
            &req.from_custodian,
            &req.to_custodian,
            &req.reason,
        )
        .await?;
    Ok(Json(event))
}

/// Custody timeline, oldest transfer first.
pub async fn history(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Json<HistoryResponse> {
    let events = state.custody.get_history(&fingerprint).await;
    let current_custodian = state.custody.current_custodian(&fingerprint).await;

    Json(HistoryResponse {
        evidence_fingerprint: fingerprint,
        current_custodian,
        events,
    })
}

pub async fn fingerprint(
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<FingerprintResponse>> {
    let body = body?;
    let fingerprint = compute_fingerprint(&body);
    info!("Fingerprinted upload of {} bytes: {}", body.len(), fingerprint);

    Ok(Json(FingerprintResponse {
        fingerprint,
        size: body.len(),
    }))
}

/// Re-hash an upload and compare it with `?expected=<fingerprint>`.
///
/// A mismatch is a normal `200` answer with `matches: false`.
pub async fn verify_fingerprint(
    query: std::result::Result<Query<VerifyQuery>, QueryRejection>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<VerifyResponse>> {
    let Query(query) = query?;
    require_non_empty("expected", &query.expected)?;
    let body = body?;

    let current_hash = compute_fingerprint(&body);
    let matches = fingerprint::verify_fingerprint(&body, &query.expected);

    Ok(Json(VerifyResponse {
        expected_hash: query.expected.trim().to_string(),
        current_hash,
        matches,
        size: body.len(),
    }))
}
