//! # Permit Status
//!
//! The closed set of permit statuses. Serialized (and persisted) as the
//! lowercase strings `pending`, `approved`, `revoked`, `expired`.

use serde::{Deserialize, Serialize};

use permit_core::ValidationError;

/// The lifecycle status of a permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermitStatus {
    /// Application submitted, awaiting review. Initial state.
    Pending,
    /// Application approved (terminal).
    Approved,
    /// Application revoked (terminal).
    Revoked,
    /// Application left unreviewed past the grace period (terminal).
    Expired,
}

impl PermitStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [PermitStatus; 4] = [
        Self::Pending,
        Self::Approved,
        Self::Revoked,
        Self::Expired,
    ];

    /// Return the string representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether the state machine defines an edge from `self` to `to`.
    ///
    /// Only `pending` has outgoing edges. Note that the direct transition
    /// operation does not consult this (see [`crate::Permit::apply`]); it
    /// is used to flag overwrites of terminal states.
    pub fn can_transition_to(&self, to: PermitStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Revoked)
                | (Self::Pending, Self::Expired)
        )
    }
}

impl std::fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermitStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "revoked" => Ok(Self::Revoked),
            "expired" => Ok(Self::Expired),
            other => Err(ValidationError::UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!PermitStatus::Pending.is_terminal());
        assert!(PermitStatus::Approved.is_terminal());
        assert!(PermitStatus::Revoked.is_terminal());
        assert!(PermitStatus::Expired.is_terminal());
    }

    #[test]
    fn pending_has_three_outgoing_edges() {
        let targets: Vec<_> = PermitStatus::ALL
            .into_iter()
            .filter(|to| PermitStatus::Pending.can_transition_to(*to))
            .collect();
        assert_eq!(
            targets,
            vec![
                PermitStatus::Approved,
                PermitStatus::Revoked,
                PermitStatus::Expired
            ]
        );
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for from in PermitStatus::ALL.into_iter().filter(PermitStatus::is_terminal) {
            for to in PermitStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(PermitStatus::Pending.to_string(), "pending");
        assert_eq!(PermitStatus::Approved.to_string(), "approved");
        assert_eq!(PermitStatus::Revoked.to_string(), "revoked");
        assert_eq!(PermitStatus::Expired.to_string(), "expired");
    }

    #[test]
    fn serde_matches_display() {
        for status in PermitStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn parse_rejects_other_case_and_unknown() {
        assert!("Pending".parse::<PermitStatus>().is_err());
        assert!("PENDING".parse::<PermitStatus>().is_err());
        let err = "archived".parse::<PermitStatus>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownStatus("archived".into()));
    }

    proptest! {
        #[test]
        fn parse_accepts_exactly_the_four_names(s in "[a-z]{0,10}") {
            let known = PermitStatus::ALL.iter().any(|st| st.as_str() == s);
            prop_assert_eq!(s.parse::<PermitStatus>().is_ok(), known);
        }
    }
}
