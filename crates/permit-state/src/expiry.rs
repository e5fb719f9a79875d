//! # Automatic Expiry
//!
//! A pending permit has a fixed grace period to be reviewed. The sweep
//! computes a cut-off `now - threshold` and expires every permit that is
//! still `pending` and was created strictly before the cut-off.
//!
//! The rule is idempotent: once a permit is expired it is no longer
//! `pending`, so a repeated sweep with the same `now` changes nothing.

use std::time::Duration;

use permit_core::Timestamp;

use crate::error::LifecycleError;
use crate::permit::Permit;
use crate::status::PermitStatus;

/// Default grace period for unreviewed applications (5 minutes).
pub const DEFAULT_EXPIRY_THRESHOLD: Duration = Duration::from_secs(5 * 60);

/// The grace-period rule applied by the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    threshold: Duration,
}

impl ExpiryPolicy {
    /// Create a policy with the given grace period.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ZeroThreshold`] for a zero duration.
    pub fn new(threshold: Duration) -> Result<Self, LifecycleError> {
        if threshold.is_zero() {
            return Err(LifecycleError::ZeroThreshold);
        }
        Ok(Self { threshold })
    }

    /// The configured grace period.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// The instant before which pending permits are stale.
    pub fn cutoff(&self, now: Timestamp) -> Result<Timestamp, LifecycleError> {
        now.checked_sub(self.threshold)
            .ok_or(LifecycleError::CutoffOutOfRange {
                now,
                threshold_secs: self.threshold.as_secs(),
            })
    }
}

/// Whether a permit with this status and creation time is past `cutoff`.
pub fn is_stale(status: PermitStatus, created_at: Timestamp, cutoff: Timestamp) -> bool {
    status == PermitStatus::Pending && created_at < cutoff
}

/// Expire every stale permit in `permits`, returning how many changed.
///
/// Intended for stores that hold permits in process and can run this
/// under a single lock.
pub fn expire_stale<'a>(permits: impl IntoIterator<Item = &'a mut Permit>, cutoff: Timestamp) -> u64 {
    let mut expired = 0;
    for permit in permits {
        if is_stale(permit.status, permit.created_at, cutoff) {
            permit.status = PermitStatus::Expired;
            expired += 1;
        }
    }
    expired
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_EXPIRY_THRESHOLD,
        }
    }
}
