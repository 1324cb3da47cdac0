//! HTTP surface.
//!
//! Routes:
//! - `GET /packs`: every pack summary plus the total
//! - `GET /packs/{id}`: one pack summary, 404 if unknown
//! - `GET /packs/{id}/content`: full pack, 404 if unknown
//! - `GET /health`, `GET /metrics`: probes, excluded from access logging
//!
//! The pack routes are also mounted under `/api`.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde::Serialize;
use serde_json::json;

use super::access_log::AccessLog;
use super::middleware::log_requests;
use crate::lookup::{Lookup, PackLookup};
use crate::telemetry::Transport;
use crate::types::HealthResponse;
use crate::PackError;

/// Route templates, used as the `operation` metrics label.
pub const LIST_ROUTE: &str = "/packs";
pub const INFO_ROUTE: &str = "/packs/{id}";
pub const CONTENT_ROUTE: &str = "/packs/{id}/content";

/// Content type of the metrics exposition.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub lookup: PackLookup,
}

impl AppState {
    pub fn new(lookup: PackLookup) -> Self {
        Self { lookup }
    }
}

/// Build the HTTP router with request logging.
pub fn router(state: AppState, access_log: AccessLog) -> Router {
    let packs = Router::new()
        .route(LIST_ROUTE, get(list_packs))
        .route(INFO_ROUTE, get(get_pack_info))
        .route(CONTENT_ROUTE, get(get_pack_content));

    Router::new()
        .merge(packs.clone())
        .nest("/api", packs)
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn_with_state(access_log, log_requests))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_packs(State(state): State<AppState>) -> Response {
    let result = state
        .lookup
        .serve(Transport::Http, LIST_ROUTE, None, |lookup| {
            lookup.list().and_then(|list| encode_json(&list))
        });
    into_response(result)
}

async fn get_pack_info(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let pack_id = path.map(|Path(id)| id);
    let result = state.lookup.serve(
        Transport::Http,
        INFO_ROUTE,
        pack_id.as_deref().ok(),
        |lookup| match &pack_id {
            Ok(id) => lookup.info(id).and_then(|summary| encode_json(&summary)),
            Err(rejection) => Lookup::Invalid(rejection.body_text()),
        },
    );
    into_response(result)
}

async fn get_pack_content(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Response {
    let pack_id = path.map(|Path(id)| id);
    let result = state.lookup.serve(
        Transport::Http,
        CONTENT_ROUTE,
        pack_id.as_deref().ok(),
        |lookup| match &pack_id {
            Ok(id) => lookup.content(id).and_then(|pack| encode_json(pack.as_ref())),
            Err(rejection) => Lookup::Invalid(rejection.body_text()),
        },
    );
    into_response(result)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

async fn metrics(State(state): State<AppState>) -> Response {
    (
        [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)],
        state.lookup.metrics().export(),
    )
        .into_response()
}

// =============================================================================
// Encoding
// =============================================================================

/// Serialize inside the measured call so encoding failures count as
/// internal errors.
fn encode_json<T: Serialize + ?Sized>(value: &T) -> Lookup<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(PackError::from)
        .into()
}

fn into_response(result: Lookup<Bytes>) -> Response {
    let status = StatusCode::from_u16(result.outcome().http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match result {
        Lookup::Found(body) => {
            (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Lookup::NotFound => error_response(status, "Pack not found", "NOT_FOUND"),
        Lookup::Invalid(reason) => error_response(status, &reason, "BAD_REQUEST"),
        Lookup::Internal(_) => error_response(status, "internal error", "INTERNAL_ERROR"),
    }
}

fn error_response(status: StatusCode, message: &str, code: &str) -> Response {
    (status, Json(json!({ "error": message, "code": code }))).into_response()
}
