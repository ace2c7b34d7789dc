//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /api/v1/products - Browse (category, search, min_price, max_price, sort)
///   - GET  /api/v1/products/{product_id} - Get product by ID
///   - GET  /api/v1/collections - Categories
///   - GET  /api/v1/shipping-methods - Checkout shipping options
///
/// - Carts:
///   - POST   /api/v1/carts - Create cart
///   - GET    /api/v1/carts/{cart_id} - Snapshot
///   - DELETE /api/v1/carts/{cart_id} - Drop cart
///   - POST   /api/v1/carts/{cart_id}/actions - Dispatch a `CartAction`
///   - POST   /api/v1/carts/{cart_id}/items - Add catalog product and open
///   - GET    /api/v1/carts/{cart_id}/summary - Order summary
///   - POST   /api/v1/carts/{cart_id}/checkout - Place order
///
/// - Auth:
///   - POST /api/v1/auth/login
///   - POST /api/v1/auth/register
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product))
        .route("/collections", get(handlers::list_collections))
        .route("/shipping-methods", get(handlers::list_shipping_methods));

    let cart_routes = Router::new()
        .route("/", post(handlers::create_cart))
        .route(
            "/{cart_id}",
            get(handlers::get_cart).delete(handlers::delete_cart),
        )
        .route("/{cart_id}/actions", post(handlers::dispatch_action))
        .route("/{cart_id}/items", post(handlers::add_item))
        .route("/{cart_id}/summary", get(handlers::get_summary))
        .route("/{cart_id}/checkout", post(handlers::checkout));

    let auth_routes = Router::new()
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register));

    let api_routes = Router::new()
        .merge(catalog_routes)
        .nest("/carts", cart_routes)
        .nest("/auth", auth_routes);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
