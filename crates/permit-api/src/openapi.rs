//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI spec
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Permit Management API",
        version = "0.1.0",
        description = "Residential parking permit applications: submission, review, and automatic expiry of unreviewed applications.",
        license(name = "AGPL-3.0-or-later")
    ),
    paths(
        // Permits
        crate::routes::permits::create_permit,
        crate::routes::permits::list_permits,
        crate::routes::permits::approve_permit,
        crate::routes::permits::revoke_permit,
        // Health
        crate::routes::health::health,
        crate::routes::health::readiness,
        crate::routes::health::metrics,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::permits::CreatePermitRequest,
        crate::routes::permits::PermitResponse,
        crate::routes::health::HealthResponse,
        crate::routes::health::ReadinessResponse,
        crate::middleware::metrics::MetricsSnapshot,
    )),
    tags(
        (name = "permits", description = "Permit applications and review"),
        (name = "health", description = "Liveness, readiness, and metrics"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json - Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_permit_path() {
        let spec = ApiDoc::openapi();
        for path in [
            "/permits",
            "/permits/{permit_id}/approve",
            "/permits/{permit_id}/revoke",
            "/health",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
