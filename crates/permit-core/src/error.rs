//! # Error Hierarchy
//!
//! Validation errors for domain primitives, built with `thiserror`.
//!
//! Each variant carries the rejected input (or the field it belongs to) so
//! that a caller can report field-level detail without re-parsing the
//! message.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Each type enforces its format at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field was empty or whitespace-only.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// Permit identifier does not match the documented string encoding.
    #[error("invalid permit id: \"{0}\" (expected a hyphenated UUID)")]
    InvalidPermitId(String),

    /// Status string is not one of the known permit statuses.
    #[error("invalid status: \"{0}\" (expected one of pending, approved, revoked, expired)")]
    UnknownStatus(String),

    /// Timestamp string is not valid UTC ISO 8601.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// The request field this error refers to, if it is field-specific.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyField { field } => Some(field),
            Self::InvalidPermitId(_) => Some("id"),
            Self::UnknownStatus(_) => Some("status"),
            Self::InvalidTimestamp { .. } => None,
        }
    }
}
