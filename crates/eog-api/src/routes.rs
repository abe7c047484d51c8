//! # Routes
//!
//! Axum router configuration for the pricing API.

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
/// - GET  /health - Health check
/// - GET  /api/v1/catalog - Tiers and add-ons
/// - GET  /api/v1/catalog/tiers/{tier_id} - Single tier
/// - GET  /api/v1/catalog/add-ons/{add_on_id} - Single add-on
/// - POST /api/v1/pricing/quote - Price a selection
pub fn create_router(state: AppState) -> Router {
    // The browser app is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Catalog
        .route("/catalog", get(handlers::get_catalog))
        .route("/catalog/tiers/{tier_id}", get(handlers::get_tier))
        .route("/catalog/add-ons/{add_on_id}", get(handlers::get_add_on))
        // Pricing
        .route("/pricing/quote", post(handlers::create_quote));

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
