//! # Permit Record and Direct Transitions
//!
//! A [`Permit`] is created `pending` from a validated
//! [`PermitApplication`]. Approve and revoke are the only direct
//! transitions; expiry is reserved for the sweep (see [`crate::expiry`]).
//!
//! ## Unconditional overwrite
//!
//! [`Permit::apply`] sets the target status regardless of the current one,
//! matching the store-level "update by id, set status" semantics. A revoked
//! permit can therefore be re-approved and vice versa. The returned
//! [`TransitionOutcome`] reports whether a terminal status was overwritten
//! so that callers can surface it.

use serde::{Deserialize, Serialize};

use permit_core::{PermitApplication, PermitId, Timestamp};

use crate::status::PermitStatus;

/// Target of a direct (API-initiated) transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionTarget {
    /// Approve the application.
    Approved,
    /// Revoke the application.
    Revoked,
}

impl TransitionTarget {
    /// The status this target writes.
    pub fn status(self) -> PermitStatus {
        match self {
            Self::Approved => PermitStatus::Approved,
            Self::Revoked => PermitStatus::Revoked,
        }
    }
}

impl From<TransitionTarget> for PermitStatus {
    fn from(target: TransitionTarget) -> Self {
        target.status()
    }
}

impl std::fmt::Display for TransitionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status().as_str())
    }
}

/// Result of applying a direct transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// Status before the transition.
    pub from: PermitStatus,
    /// Status after the transition.
    pub to: PermitStatus,
}

impl TransitionOutcome {
    /// Whether a terminal status was replaced.
    pub fn overwrote_terminal(&self) -> bool {
        self.from.is_terminal()
    }
}

/// A residential parking permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    /// Opaque unique identifier.
    pub id: PermitId,
    /// Applicant name.
    pub name: String,
    /// Vehicle license plate.
    pub license_plate: String,
    /// Residential address.
    pub address: String,
    /// Current lifecycle status.
    pub status: PermitStatus,
    /// Creation time (UTC). Never modified.
    pub created_at: Timestamp,
}

impl Permit {
    /// Create a new pending permit.
    pub fn new(id: PermitId, application: PermitApplication, created_at: Timestamp) -> Self {
        let (name, license_plate, address) = application.into_parts();
        Self {
            id,
            name,
            license_plate,
            address,
            status: PermitStatus::Pending,
            created_at,
        }
    }

    /// Apply a direct transition, unconditionally overwriting the status.
    pub fn apply(&mut self, target: TransitionTarget) -> TransitionOutcome {
        let outcome = TransitionOutcome {
            from: self.status,
            to: target.status(),
        };
        self.status = outcome.to;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created_at() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    fn make_permit() -> Permit {
        let app = PermitApplication::new("Alice", "ABC123", "1 Main St").unwrap();
        Permit::new(PermitId::new(), app, created_at())
    }

    #[test]
    fn new_permit_is_pending() {
        let permit = make_permit();
        assert_eq!(permit.status, PermitStatus::Pending);
        assert_eq!(permit.name, "Alice");
        assert_eq!(permit.license_plate, "ABC123");
        assert_eq!(permit.address, "1 Main St");
    }

    #[test]
    fn approve_from_pending_follows_machine() {
        let mut permit = make_permit();
        let outcome = permit.apply(TransitionTarget::Approved);
        assert_eq!(permit.status, PermitStatus::Approved);
        assert!(outcome.from.can_transition_to(outcome.to));
        assert!(!outcome.overwrote_terminal());
    }

    #[test]
    fn revoke_from_pending_follows_machine() {
        let mut permit = make_permit();
        let outcome = permit.apply(TransitionTarget::Revoked);
        assert_eq!(permit.status, PermitStatus::Revoked);
        assert!(!outcome.overwrote_terminal());
    }

    #[test]
    fn approve_then_revoke_overwrites() {
        let mut permit = make_permit();
        permit.apply(TransitionTarget::Approved);
        let outcome = permit.apply(TransitionTarget::Revoked);
        assert_eq!(permit.status, PermitStatus::Revoked);
        assert_eq!(outcome.from, PermitStatus::Approved);
        assert!(!outcome.from.can_transition_to(outcome.to));
        assert!(outcome.overwrote_terminal());
    }

    #[test]
    fn expired_permit_can_be_reapproved() {
        let mut permit = make_permit();
        permit.status = PermitStatus::Expired;
        let outcome = permit.apply(TransitionTarget::Approved);
        assert_eq!(permit.status, PermitStatus::Approved);
        assert!(outcome.overwrote_terminal());
    }

    #[test]
    fn transition_never_touches_created_at() {
        let mut permit = make_permit();
        permit.apply(TransitionTarget::Approved);
        permit.apply(TransitionTarget::Revoked);
        assert_eq!(permit.created_at, created_at());
    }

    #[test]
    fn permit_json_shape() {
        let permit = make_permit();
        let json = serde_json::to_value(&permit).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["created_at"], "2026-01-15T12:00:00Z");
        assert_eq!(json["id"], permit.id.to_string());
    }

    #[test]
    fn target_display() {
        assert_eq!(TransitionTarget::Approved.to_string(), "approved");
        assert_eq!(TransitionTarget::Revoked.to_string(), "revoked");
        assert_eq!(PermitStatus::from(TransitionTarget::Revoked), PermitStatus::Revoked);
    }
}
