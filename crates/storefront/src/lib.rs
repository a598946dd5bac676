//! RocketShoes storefront library.
//!
//! Provides the storefront functionality as a library so the binary and
//! the integration tests share the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod notify;
pub mod routes;
pub mod snapshot;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the storefront application router.
#[must_use]
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the catalog.
async fn health() -> &'static str {
    "ok"
}
