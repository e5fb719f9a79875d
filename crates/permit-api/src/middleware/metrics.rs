//! # Service Metrics
//!
//! Lightweight in-process counters: HTTP requests, HTTP error responses,
//! and permits expired by the sweep. Served as JSON at `/metrics`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use serde::Serialize;
use utoipa::ToSchema;

/// Shared metrics state. Clones share the same counters.
#[derive(Debug, Clone, Default)]
pub struct ApiMetrics {
    request_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
    expired_count: Arc<AtomicU64>,
    sweep_count: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MetricsSnapshot {
    /// HTTP requests served.
    pub requests: u64,
    /// HTTP responses with a 4xx or 5xx status.
    pub errors: u64,
    /// Completed sweep runs.
    pub sweeps: u64,
    /// Permits moved to `expired` by the sweep.
    pub permits_expired: u64,
}

impl ApiMetrics {
    /// Create a new metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return current request count.
    pub fn requests(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Return current error count.
    pub fn errors(&self) -> u64 {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Record a completed sweep that expired `expired` permits.
    pub fn record_sweep(&self, expired: u64) {
        self.sweep_count.fetch_add(1, Ordering::Relaxed);
        self.expired_count.fetch_add(expired, Ordering::Relaxed);
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests(),
            errors: self.errors(),
            sweeps: self.sweep_count.load(Ordering::Relaxed),
            permits_expired: self.expired_count.load(Ordering::Relaxed),
        }
    }
}

/// Middleware that increments request and error counters.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let metrics = request.extensions().get::<ApiMetrics>().cloned();

    let response = next.run(request).await;

    if let Some(m) = metrics {
        m.request_count.fetch_add(1, Ordering::Relaxed);
        if response.status().is_server_error() || response.status().is_client_error() {
            m.error_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_counters() {
        let metrics = ApiMetrics::new();
        let clone = metrics.clone();
        clone.record_sweep(3);
        clone.record_sweep(0);
        let snap = metrics.snapshot();
        assert_eq!(snap.sweeps, 2);
        assert_eq!(snap.permits_expired, 3);
        assert_eq!(snap.requests, 0);
    }
}
