//! # Permit Timestamps
//!
//! [`Timestamp`] is the only time type in the workspace. It is UTC, held at
//! whole-second precision, and renders as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Creation times and sweep cut-offs are both `Timestamp`s, so the expiry
//! comparison never mixes precisions or offsets.

use std::time::Duration;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A UTC instant with sub-second precision discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "DateTime<Utc>")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Wrap a chrono instant, dropping sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt.trunc_subsecs(0))
    }

    /// Parse an RFC 3339 instant written in UTC with a `Z` suffix.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidTimestamp`] for malformed input or any
    /// explicit offset, `+00:00` included.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: String| ValidationError::InvalidTimestamp {
            value: s.to_string(),
            reason,
        };
        if !s.ends_with('Z') {
            return Err(invalid("expected a Z (UTC) suffix".into()));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_utc(dt.with_timezone(&Utc)))
            .map_err(|e| invalid(e.to_string()))
    }

    /// The wrapped chrono instant.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// `self - d`, or `None` if out of chrono's range.
    pub fn checked_sub(&self, d: Duration) -> Option<Self> {
        let delta = chrono::Duration::from_std(d).ok()?;
        self.0.checked_sub_signed(delta).map(Self::from_utc)
    }

    /// `self + d`, or `None` if out of chrono's range.
    pub fn checked_add(&self, d: Duration) -> Option<Self> {
        let delta = chrono::Duration::from_std(d).ok()?;
        self.0.checked_add_signed(delta).map(Self::from_utc)
    }

    /// The wire form, e.g. `2026-01-15T12:00:00Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_utc(dt)
    }
}
