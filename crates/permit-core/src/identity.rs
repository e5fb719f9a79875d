//! # Identity Newtypes
//!
//! [`PermitId`] is the opaque identifier of a permit. It is assigned once
//! when the permit is created and never reused.
//!
//! ## String Encoding
//!
//! The external form is a hyphenated UUID, e.g.
//! `67e55044-10b1-426f-9247-bb680e5fe0c8`. Rendering always produces the
//! lowercase form; parsing accepts either case but rejects the simple,
//! braced, and URN UUID spellings so that one permit has exactly one
//! accepted textual form (modulo case).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Length of the hyphenated UUID encoding.
const ENCODED_LEN: usize = 36;

/// A unique identifier for a residential parking permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermitId(Uuid);

impl PermitId {
    /// Create a new random permit identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a permit identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a permit identifier from its string encoding.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPermitId`] if `s` is not a
    /// hyphenated UUID.
    pub fn try_parse(s: &str) -> Result<Self, ValidationError> {
        if s.len() != ENCODED_LEN {
            return Err(ValidationError::InvalidPermitId(s.to_string()));
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| ValidationError::InvalidPermitId(s.to_string()))
    }
}

impl Default for PermitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PermitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for PermitId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_ids_are_distinct() {
        assert_ne!(PermitId::new(), PermitId::new());
    }

    #[test]
    fn display_is_lowercase_hyphenated() {
        let id = PermitId::try_parse("67E55044-10B1-426F-9247-BB680E5FE0C8").unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
    }

    #[test]
    fn parse_display_roundtrip() {
        let id = PermitId::new();
        assert_eq!(PermitId::try_parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn rejects_other_uuid_spellings() {
        let simple = "67e5504410b1426f9247bb680e5fe0c8";
        let braced = "{67e55044-10b1-426f-9247-bb680e5fe0c8}";
        let urn = "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8";
        for s in [simple, braced, urn] {
            assert!(PermitId::try_parse(s).is_err(), "accepted {s}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "abc", "not-a-uuid-not-a-uuid-not-a-uuid-xx", "507f1f77bcf86cd799439011"] {
            let err = PermitId::try_parse(s).unwrap_err();
            assert_eq!(err, ValidationError::InvalidPermitId(s.to_string()));
        }
    }

    #[test]
    fn from_str_delegates_to_try_parse() {
        let id = PermitId::new();
        let parsed: PermitId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = PermitId::try_parse("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"67e55044-10b1-426f-9247-bb680e5fe0c8\"");
    }

    proptest! {
        #[test]
        fn any_uuid_survives_string_encoding(bytes in any::<[u8; 16]>()) {
            let id = PermitId::from_uuid(Uuid::from_bytes(bytes));
            prop_assert_eq!(PermitId::try_parse(&id.to_string()).unwrap(), id);
        }

        #[test]
        fn short_strings_never_parse(s in "[0-9a-f-]{0,35}") {
            prop_assert!(PermitId::try_parse(&s).is_err());
        }
    }
}
