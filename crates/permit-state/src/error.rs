//! Errors raised by lifecycle rules.

use thiserror::Error;

use permit_core::Timestamp;

/// Errors that can occur while applying lifecycle rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The expiry threshold must be a positive duration.
    #[error("expiry threshold must be greater than zero")]
    ZeroThreshold,

    /// `now - threshold` is not representable.
    #[error("expiry cut-off out of range: {now} minus {threshold_secs}s")]
    CutoffOutOfRange {
        /// The sweep's reference instant.
        now: Timestamp,
        /// The configured threshold in seconds.
        threshold_secs: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_out_of_range_display() {
        let now = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let err = LifecycleError::CutoffOutOfRange {
            now,
            threshold_secs: 300,
        };
        let msg = err.to_string();
        assert!(msg.contains("2026-01-15T12:00:00Z"));
        assert!(msg.contains("300s"));
    }
}
