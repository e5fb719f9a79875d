//! # Permit API
//!
//! REST endpoints for residential parking permit applications.
//!
//! ## Endpoints
//!
//! - `POST /permits`              - Submit a new application (`pending`)
//! - `GET  /permits`              - List permits, optionally by `status_filter`
//! - `POST /permits/{id}/approve` - Approve a permit
//! - `POST /permits/{id}/revoke`  - Revoke a permit
//!
//! Approve and revoke overwrite whatever status the permit has. Expiry is
//! never set through this API; the sweep owns that transition.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use permit_core::PermitApplication;
use permit_state::{Permit, PermitStatus, TransitionTarget};

use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::lifecycle;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to submit a permit application.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePermitRequest {
    /// Applicant name.
    pub name: String,
    /// Vehicle license plate.
    pub license_plate: String,
    /// Residential address.
    pub address: String,
}

impl Validate for CreatePermitRequest {
    type Output = PermitApplication;

    fn validate(self) -> Result<PermitApplication, AppError> {
        Ok(PermitApplication::new(
            self.name,
            self.license_plate,
            self.address,
        )?)
    }
}

/// Query parameters for listing permits.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListPermitsParams {
    /// Only return permits with this status: `pending`, `approved`,
    /// `revoked`, or `expired`.
    pub status_filter: Option<String>,
}

/// A permit as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PermitResponse {
    /// Permit identifier (lowercase hyphenated UUID).
    pub id: Uuid,
    /// Applicant name.
    pub name: String,
    /// Vehicle license plate.
    pub license_plate: String,
    /// Residential address.
    pub address: String,
    /// One of `pending`, `approved`, `revoked`, `expired`.
    pub status: String,
    /// Creation time, `YYYY-MM-DDTHH:MM:SSZ`.
    pub created_at: String,
}

impl From<Permit> for PermitResponse {
    fn from(permit: Permit) -> Self {
        Self {
            id: *permit.id.as_uuid(),
            name: permit.name,
            license_plate: permit.license_plate,
            address: permit.address,
            status: permit.status.as_str().to_string(),
            created_at: permit.created_at.to_iso8601(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the permits router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/permits", post(create_permit).get(list_permits))
        .route("/permits/{permit_id}/approve", post(approve_permit))
        .route("/permits/{permit_id}/revoke", post(revoke_permit))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /permits - Submit a permit application.
#[utoipa::path(
    post,
    path = "/permits",
    request_body = CreatePermitRequest,
    responses(
        (status = 201, description = "Permit created", body = PermitResponse),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorBody),
    ),
    tag = "permits"
)]
pub(crate) async fn create_permit(
    State(state): State<AppState>,
    body: Result<Json<CreatePermitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PermitResponse>), AppError> {
    let application = extract_validated_json(body)?;
    let permit = lifecycle::create_permit(state.store.as_ref(), application).await?;
    Ok((StatusCode::CREATED, Json(permit.into())))
}

/// GET /permits - List permits.
#[utoipa::path(
    get,
    path = "/permits",
    params(ListPermitsParams),
    responses(
        (status = 200, description = "Permits ordered by creation time", body = Vec<PermitResponse>),
        (status = 422, description = "Unknown status filter", body = crate::error::ErrorBody),
    ),
    tag = "permits"
)]
pub(crate) async fn list_permits(
    State(state): State<AppState>,
    params: Result<Query<ListPermitsParams>, QueryRejection>,
) -> Result<Json<Vec<PermitResponse>>, AppError> {
    let Query(params) = params.map_err(|e| AppError::validation(e.body_text()))?;
    let status = params
        .status_filter
        .as_deref()
        .map(str::parse::<PermitStatus>)
        .transpose()?;

    let permits = lifecycle::list_permits(state.store.as_ref(), status).await?;
    Ok(Json(permits.into_iter().map(PermitResponse::from).collect()))
}

/// POST /permits/{permit_id}/approve - Approve a permit.
#[utoipa::path(
    post,
    path = "/permits/{permit_id}/approve",
    params(("permit_id" = String, Path, description = "Permit UUID")),
    responses(
        (status = 200, description = "Permit approved", body = PermitResponse),
        (status = 404, description = "Permit not found", body = crate::error::ErrorBody),
    ),
    tag = "permits"
)]
pub(crate) async fn approve_permit(
    State(state): State<AppState>,
    Path(permit_id): Path<String>,
) -> Result<Json<PermitResponse>, AppError> {
    transition(&state, &permit_id, TransitionTarget::Approved).await
}

/// POST /permits/{permit_id}/revoke - Revoke a permit.
#[utoipa::path(
    post,
    path = "/permits/{permit_id}/revoke",
    params(("permit_id" = String, Path, description = "Permit UUID")),
    responses(
        (status = 200, description = "Permit revoked", body = PermitResponse),
        (status = 404, description = "Permit not found", body = crate::error::ErrorBody),
    ),
    tag = "permits"
)]
pub(crate) async fn revoke_permit(
    State(state): State<AppState>,
    Path(permit_id): Path<String>,
) -> Result<Json<PermitResponse>, AppError> {
    transition(&state, &permit_id, TransitionTarget::Revoked).await
}

async fn transition(
    state: &AppState,
    permit_id: &str,
    target: TransitionTarget,
) -> Result<Json<PermitResponse>, AppError> {
    let permit = lifecycle::transition_permit(state.store.as_ref(), permit_id, target).await?;
    Ok(Json(permit.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_core::{PermitId, Timestamp};

    #[test]
    fn response_renders_lowercase_status_and_z_time() {
        let app = PermitApplication::new("Alice", "ABC123", "1 Main St").unwrap();
        let created = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let permit = Permit::new(PermitId::new(), app, created);
        let id = permit.id;
        let json = serde_json::to_value(PermitResponse::from(permit)).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["created_at"], "2026-01-15T12:00:00Z");
    }

    #[test]
    fn create_request_validates_into_application() {
        let req = CreatePermitRequest {
            name: " Alice ".into(),
            license_plate: "ABC123".into(),
            address: "1 Main St ".into(),
        };
        let app = req.validate().unwrap();
        assert_eq!(app.name(), " Alice ");
        assert_eq!(app.address(), "1 Main St ");
    }

    #[test]
    fn create_request_rejects_blank_field() {
        let req = CreatePermitRequest {
            name: "Alice".into(),
            license_plate: "".into(),
            address: "1 Main St".into(),
        };
        assert!(matches!(
            req.validate(),
            Err(AppError::Validation { field: Some(ref f), .. }) if f == "license_plate"
        ));
    }
}
