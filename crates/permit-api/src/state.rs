//! # Application State
//!
//! Shared state for the Axum application: the permit store, the expiry
//! policy, and the metrics counters. Cloning is cheap; every clone shares
//! the same store and counters.

use std::sync::Arc;

use permit_state::ExpiryPolicy;

use crate::middleware::metrics::ApiMetrics;
use crate::store::{MemoryPermitStore, PermitStore};

/// Shared application state passed to all route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Permit persistence.
    pub store: Arc<dyn PermitStore>,
    /// Grace period for pending permits.
    pub expiry: ExpiryPolicy,
    /// Request and sweep counters.
    pub metrics: ApiMetrics,
}

impl AppState {
    /// State over an empty in-memory store with the default policy.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryPermitStore::new()))
    }

    /// State over `store` with the default policy.
    pub fn with_store(store: Arc<dyn PermitStore>) -> Self {
        Self {
            store,
            expiry: ExpiryPolicy::default(),
            metrics: ApiMetrics::new(),
        }
    }

    /// Replace the expiry policy.
    pub fn with_expiry(mut self, expiry: ExpiryPolicy) -> Self {
        self.expiry = expiry;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
