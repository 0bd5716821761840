//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings content store)
//!
//! # Products
//! GET  /products               - Product listing
//! GET  /products/{id}          - Product detail
//!
//! # Cart (fragments)
//! GET  /cart                   - Cart contents with subtotal
//! POST /cart/add               - Add item (triggers cart-updated)
//! POST /cart/remove            - Remove item (returns updated cart)
//! GET  /cart/count             - Cart count badge
//! ```

pub mod cart;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}
