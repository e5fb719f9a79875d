#![deny(missing_docs)]

//! # permit-core - Foundational Types for the Permit Service
//!
//! This crate defines the domain primitives every other crate in the
//! workspace depends on. It has no internal crate dependencies: only
//! `serde`, `thiserror`, `chrono`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** A [`PermitId`] is opaque:
//!    callers see a documented string encoding and a fallible parser, never
//!    the underlying byte layout.
//!
//! 2. **UTC-only time.** [`Timestamp`] is always UTC, seconds precision,
//!    rendered with a `Z` suffix.
//!
//! 3. **Validate at construction.** [`PermitApplication`] cannot hold an
//!    empty applicant name, license plate, or address.

pub mod application;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use application::PermitApplication;
pub use error::ValidationError;
pub use identity::PermitId;
pub use temporal::Timestamp;
