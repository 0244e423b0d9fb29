use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::acl::{Block, BlockAction, ChainReport};
use crate::api::AppState;
use crate::error::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRequest {
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub actor_id: String,
    /// When set, the grant only lands if this is still the tail block.
    pub expected_previous_block_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeRequest {
    #[serde(default)]
    pub file_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub actor_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckQuery {
    pub file_id: String,
    pub user_id: String,
    pub permission: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
}

pub async fn grant(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GrantRequest>, JsonRejection>,
) -> Result<Json<Block>> {
    let Json(req) = payload?;
    let block = match req.expected_previous_block_id {
        Some(expected) => {
            let action = BlockAction::Grant {
                file_id: req.file_id,
                user_id: req.user_id,
                permission: req.permission,
                actor_id: req.actor_id,
            };
            state.ledger.append_after(Some(expected.as_str()), action).await?
        }
        None => {
            state
                .ledger
                .grant(&req.file_id, &req.user_id, &req.permission, &req.actor_id)
                .await?
        }
    };
    Ok(Json(block))
}

pub async fn revoke(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RevokeRequest>, JsonRejection>,
) -> Result<Json<Block>> {
    let Json(req) = payload?;
    let block = state
        .ledger
        .revoke(&req.file_id, &req.user_id, &req.actor_id)
        .await?;
    Ok(Json(block))
}

pub async fn check_access(
    State(state): State<AppState>,
    query: std::result::Result<Query<CheckQuery>, QueryRejection>,
) -> Result<Json<CheckResponse>> {
    let Query(query) = query?;
    let allowed = state
        .ledger
        .check_access(&query.file_id, &query.user_id, &query.permission)
        .await;
    Ok(Json(CheckResponse { allowed }))
}

pub async fn access_logs(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Json<Vec<Block>> {
    Json(state.ledger.get_access_logs(&file_id).await)
}

/// Whole ledger in insertion order, the input format of `verify-ledger`.
pub async fn export_blocks(State(state): State<AppState>) -> Json<Vec<Block>> {
    Json(state.ledger.blocks().await)
}

pub async fn verify(State(state): State<AppState>) -> Result<Json<ChainReport>> {
    Ok(Json(state.ledger.verify().await?))
}
