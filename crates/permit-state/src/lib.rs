//! # permit-state - Permit Lifecycle Engine
//!
//! Pure logic governing which permit statuses exist, which transitions are
//! legal, and when a pending permit expires. Holds no state between
//! invocations; callers fetch a [`Permit`] from a store, apply the rules
//! here, and write the result back.
//!
//! ## State Machine
//!
//! ```text
//!             approve            (terminal)
//!          ┌──────────▶ APPROVED
//!          │
//! PENDING ─┼──────────▶ REVOKED  (terminal)
//!          │  revoke
//!          │
//!          └──────────▶ EXPIRED  (terminal)
//!             sweep only
//! ```
//!
//! - **Status** (`status.rs`): the four statuses, their string encoding, and
//!   the legal edges.
//! - **Permit** (`permit.rs`): the permit record and the direct transition
//!   operation ([`TransitionTarget`] has no `Expired` variant, so an API call
//!   cannot expire a permit).
//! - **Expiry** (`expiry.rs`): the grace-period rule applied by the sweep.

pub mod error;
pub mod expiry;
pub mod permit;
pub mod status;

pub use error::LifecycleError;
pub use expiry::{expire_stale, is_stale, ExpiryPolicy, DEFAULT_EXPIRY_THRESHOLD};
pub use permit::{Permit, TransitionOutcome, TransitionTarget};
pub use status::PermitStatus;
