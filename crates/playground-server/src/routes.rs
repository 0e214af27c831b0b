//! Route definitions for the playground server.

use axum::routing::get;
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the Axum router.
///
/// Health endpoints are fixed; every other path falls through to the
/// static file handler.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.request_timeout();
    let concurrency = state.concurrency_limit();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/health/live", get(handlers::health_live))
        .route("/status", get(handlers::status))
        .fallback(handlers::serve_static)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(ConcurrencyLimitLayer::new(concurrency))
}
