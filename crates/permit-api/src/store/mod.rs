//! # Permit Persistence
//!
//! The [`PermitStore`] trait is the only seam between the lifecycle
//! operations and storage. Two implementations:
//!
//! - [`MemoryPermitStore`]: process-local, used when `DATABASE_URL` is
//!   unset and by every test.
//! - [`PgPermitStore`]: PostgreSQL via SQLx, with embedded migrations.
//!
//! Each method is a single atomic store operation. Transitions are an
//! update-by-id that returns the prior status; the sweep is one conditional
//! bulk update. No method holds a lock across an `.await`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use permit_core::{PermitId, Timestamp};
use permit_state::{Permit, PermitStatus, TransitionOutcome, TransitionTarget};

pub use memory::MemoryPermitStore;
pub use postgres::PgPermitStore;

/// Errors raised by a permit store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not be reached (connect, timeout, pool closed).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A persisted row could not be decoded into a [`Permit`].
    #[error("corrupt permit record {id}: {reason}")]
    Corrupt {
        /// Raw id of the offending row.
        id: String,
        /// What failed to decode.
        reason: String,
    },

    /// Any other backend failure (constraint violation, migration, SQL).
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Unavailable(err.to_string()),
            other => Self::Backend(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Backend(format!("migration failed: {err}"))
    }
}

/// A permit after a direct transition, with the status it replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transitioned {
    /// The permit as stored after the update.
    pub permit: Permit,
    /// Previous and new status.
    pub outcome: TransitionOutcome,
}

/// Persistence for permits.
#[async_trait]
pub trait PermitStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs and readiness output.
    fn backend(&self) -> &'static str;

    /// Persist a newly created permit.
    async fn insert(&self, permit: &Permit) -> Result<(), StoreError>;

    /// All permits, or those with `status`, ordered by `created_at` then `id`.
    async fn list(&self, status: Option<PermitStatus>) -> Result<Vec<Permit>, StoreError>;

    /// Overwrite the status of permit `id`. `None` when no such permit
    /// exists, in which case nothing is written.
    async fn transition(
        &self,
        id: PermitId,
        target: TransitionTarget,
    ) -> Result<Option<Transitioned>, StoreError>;

    /// Expire every pending permit created strictly before `cutoff`.
    /// Returns the number of permits changed.
    async fn expire_pending_before(&self, cutoff: Timestamp) -> Result<u64, StoreError>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release backend resources. Further calls fail with
    /// [`StoreError::Unavailable`] on backends that hold connections.
    async fn close(&self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_unavailable() {
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn row_errors_are_backend() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
    }

    #[test]
    fn corrupt_display_names_row() {
        let err = StoreError::Corrupt {
            id: "abc".into(),
            reason: "unknown status".into(),
        };
        assert_eq!(err.to_string(), "corrupt permit record abc: unknown status");
    }
}
