//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /            - Product listing
//!
//! # Cart (HTMX fragments)
//! GET  /cart        - Cart page
//! POST /cart/add    - Add one unit (returns cart_count fragment)
//! POST /cart/update - Set quantity (returns cart_items fragment)
//! POST /cart/remove - Remove line (returns cart_items fragment)
//! GET  /cart/count  - Cart count badge (fragment)
//! ```
//!
//! Cart mutation outcomes reach the browser as `HX-Trigger` toast
//! events; the handlers themselves always respond 200 with the current
//! state re-rendered.

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product listing
        .route("/", get(home::index))
        // Cart routes
        .nest("/cart", cart_routes())
}
