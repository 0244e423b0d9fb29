//! HTTP API
//!
//! JSON mapping of the ledger, custody and fingerprint operations.

pub mod acl;
pub mod custody;
pub mod status;

use axum::{
    extract::{
        rejection::{BytesRejection, JsonRejection, QueryRejection},
        DefaultBodyLimit,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::acl::AclLedger;
use crate::config::AppConfig;
use crate::custody::CustodyLog;
use crate::error::LedgerError;
use crate::status::StatusService;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: AclLedger,
    pub custody: CustodyLog,
    pub status: StatusService,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let ledger = if config.seed_demo_data {
            AclLedger::with_demo_seed()
        } else {
            AclLedger::new()
        };
        let custody = CustodyLog::new();
        let status = StatusService::new(ledger.clone(), custody.clone(), config.network.clone());

        Self {
            ledger,
            custody,
            status,
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/health", get(status::health_check))
        .route("/status", get(status::status_endpoint))
        .route("/acl/grant", post(acl::grant))
        .route("/acl/revoke", post(acl::revoke))
        .route("/acl/check", get(acl::check_access))
        .route("/acl/logs/:file_id", get(acl::access_logs))
        .route("/acl/blocks", get(acl::export_blocks))
        .route("/acl/verify", get(acl::verify))
        .route("/custody/transfer", post(custody::record_transfer))
        .route("/custody/history/:fingerprint", get(custody::history))
        .route("/fingerprint", post(custody::fingerprint))
        .route("/fingerprint/verify", post(custody::verify_fingerprint))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .into_inner(),
        )
        .with_state(state)
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = match &self {
            LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            LedgerError::ConcurrencyConflict { .. } => StatusCode::CONFLICT,
            LedgerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// Extractor rejections are reported in the same JSON error shape as
// ledger errors.
fn rejected(status: StatusCode, message: String) -> LedgerError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        LedgerError::PayloadTooLarge(message)
    } else {
        LedgerError::InvalidArgument(message)
    }
}

impl From<JsonRejection> for LedgerError {
    fn from(rejection: JsonRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for LedgerError {
    fn from(rejection: QueryRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<BytesRejection> for LedgerError {
    fn from(rejection: BytesRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}
