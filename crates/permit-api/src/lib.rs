//! # permit-api - Residential Parking Permit Service
//!
//! Axum API and background sweep for residential parking permits.
//!
//! ## API Surface
//!
//! | Path                        | Module               |
//! |-----------------------------|----------------------|
//! | `/permits*`                 | [`routes::permits`]  |
//! | `/health`, `/health/readiness`, `/metrics` | [`routes::health`] |
//! | `/openapi.json`             | [`openapi`]          |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## Layers
//!
//! Handlers validate input shape and delegate to [`lifecycle`], which
//! applies `permit-state` rules against a [`store::PermitStore`]. The
//! [`sweep`] scheduler calls the same lifecycle operation on a timer.

pub mod config;
pub mod error;
pub mod extractors;
pub mod lifecycle;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;
pub mod store;
pub mod sweep;

use axum::middleware::from_fn;
use axum::Router;

pub use error::AppError;
pub use state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .merge(routes::permits::router())
        .merge(routes::health::router())
        .merge(openapi::router())
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(middleware::tracing_layer::layer())
        .layer(axum::Extension(metrics))
        .with_state(state)
}
