//! # Health & Operations
//!
//! - `GET /health`           - Liveness, always 200 while the process runs
//! - `GET /health/readiness` - 200 when the store answers a ping, else 503
//! - `GET /metrics`          - In-process request and sweep counters

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::middleware::metrics::MetricsSnapshot;
use crate::state::AppState;

/// Liveness response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Human-readable service message.
    pub message: String,
}

/// Readiness response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// Always `"ready"`.
    pub status: String,
    /// Store backend that answered the ping: `memory` or `postgres`.
    pub store: String,
}

/// Build the health and metrics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(metrics))
}

/// GET /health - Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = HealthResponse)),
    tag = "health"
)]
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Permit Management API is running.".to_string(),
    })
}

/// GET /health/readiness - Readiness probe.
#[utoipa::path(
    get,
    path = "/health/readiness",
    responses(
        (status = 200, description = "Store reachable", body = ReadinessResponse),
        (status = 503, description = "Store unreachable", body = crate::error::ErrorBody),
    ),
    tag = "health"
)]
pub(crate) async fn readiness(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, AppError> {
    state.store.ping().await?;
    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        store: state.store.backend().to_string(),
    }))
}

/// GET /metrics - Request and sweep counters.
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Counter snapshot", body = MetricsSnapshot)),
    tag = "health"
)]
pub(crate) async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
