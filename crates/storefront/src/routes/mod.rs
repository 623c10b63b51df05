//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog page (one card per product)
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (session database)
//!
//! # Cart (HTMX fragments)
//! POST /cart/increase          - Add one (returns item card or panel fragment)
//! POST /cart/decrease          - Take one away (returns item card or panel fragment)
//! POST /cart/remove            - Remove entirely (returns item card or panel fragment)
//! POST /cart/open              - Cart panel fragment, open
//! POST /cart/close             - Cart panel fragment, closed
//! GET  /cart/panel             - Cart panel fragment, open (self-refresh)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # API
//! GET  /api/cart               - Cart entries and totals as JSON
//! ```

pub mod api;
pub mod cart;
pub mod health;
pub mod store;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/increase", post(cart::increase))
        .route("/decrease", post(cart::decrease))
        .route("/remove", post(cart::remove))
        .route("/open", post(cart::open))
        .route("/close", post(cart::close))
        .route("/panel", get(cart::panel))
        .route("/count", get(cart::count))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/cart", get(api::cart::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(store::index))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/cart", cart_routes())
        .nest("/api", api_routes())
}
