//! # Lifecycle Operations
//!
//! The four permit operations, applying `permit-state` rules against a
//! [`PermitStore`]. Handlers, the sweep scheduler, and the `sweep`
//! subcommand all go through here; none of them touch the store directly
//! for writes.
//!
//! The `*_at` variants take the reference instant explicitly so tests can
//! pin the clock.

use thiserror::Error;

use permit_core::{PermitApplication, PermitId, Timestamp};
use permit_state::{ExpiryPolicy, LifecycleError, Permit, PermitStatus, TransitionTarget};

use crate::error::AppError;
use crate::store::{PermitStore, StoreError};

/// Errors raised by lifecycle operations.
#[derive(Error, Debug)]
pub enum OperationError {
    /// No permit has the requested id (or the id is malformed).
    #[error("permit {0} not found")]
    NotFound(String),

    /// The expiry rule could not be evaluated.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        match err {
            OperationError::NotFound(id) => Self::NotFound(format!("permit {id}")),
            OperationError::Lifecycle(e) => Self::Internal(e.to_string()),
            OperationError::Store(e) => e.into(),
        }
    }
}

/// Create a pending permit stamped with the current time.
pub async fn create_permit(
    store: &dyn PermitStore,
    application: PermitApplication,
) -> Result<Permit, OperationError> {
    create_permit_at(store, application, Timestamp::now()).await
}

/// Create a pending permit stamped with `now`.
pub async fn create_permit_at(
    store: &dyn PermitStore,
    application: PermitApplication,
    now: Timestamp,
) -> Result<Permit, OperationError> {
    let permit = Permit::new(PermitId::new(), application, now);
    store.insert(&permit).await?;
    tracing::info!(permit_id = %permit.id, "permit application created");
    Ok(permit)
}

/// All permits, or those with `status`.
pub async fn list_permits(
    store: &dyn PermitStore,
    status: Option<PermitStatus>,
) -> Result<Vec<Permit>, OperationError> {
    Ok(store.list(status).await?)
}

/// Set permit `raw_id` to `target`, whatever its current status.
///
/// An id that does not parse is reported as not found, the same as an
/// unknown one; neither writes anything.
pub async fn transition_permit(
    store: &dyn PermitStore,
    raw_id: &str,
    target: TransitionTarget,
) -> Result<Permit, OperationError> {
    let id = PermitId::try_parse(raw_id).map_err(|_| OperationError::NotFound(raw_id.to_string()))?;

    let done = store
        .transition(id, target)
        .await?
        .ok_or_else(|| OperationError::NotFound(raw_id.to_string()))?;

    if done.outcome.overwrote_terminal() {
        tracing::warn!(
            permit_id = %id,
            from = %done.outcome.from,
            to = %done.outcome.to,
            "terminal permit status overwritten"
        );
    } else {
        tracing::info!(permit_id = %id, status = %done.outcome.to, "permit transitioned");
    }

    Ok(done.permit)
}

/// Expire every pending permit older than the policy threshold at `now`.
/// Returns the number of permits expired.
pub async fn sweep_expired(
    store: &dyn PermitStore,
    now: Timestamp,
    policy: &ExpiryPolicy,
) -> Result<u64, OperationError> {
    let cutoff = policy.cutoff(now)?;
    let expired = store.expire_pending_before(cutoff).await?;
    if expired > 0 {
        tracing::info!(expired, %cutoff, "expired stale pending permits");
    } else {
        tracing::debug!(%cutoff, "no stale pending permits");
    }
    Ok(expired)
}
