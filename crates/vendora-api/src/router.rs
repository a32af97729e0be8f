//! Route definitions for the Vendora HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    http::Method,
    routing::{delete, get, patch, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(order_routes())
        .merge(inventory_routes())
        .merge(notification_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Order placement, status updates, and projections.
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(handlers::orders::create_order))
        .route("/orders/my-orders", get(handlers::orders::my_orders))
        .route(
            "/orders/seller-orders",
            get(handlers::orders::seller_orders),
        )
        .route("/orders/{id}", get(handlers::orders::get_order))
        .route("/orders/{id}", delete(handlers::orders::delete_order))
        .route("/orders/{id}/status", put(handlers::orders::update_status))
}

/// Inventory ledger endpoints.
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/inventory/upsert", post(handlers::inventory::upsert))
        .route(
            "/inventory/{product_id}",
            get(handlers::inventory::get_by_product),
        )
}

/// Notification read/ack endpoints.
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notifications::list))
        .route(
            "/notifications/read-all",
            patch(handlers::notifications::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notifications::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notifications::delete),
        )
}

/// Health probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// CORS layer from server configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    let config = &state.config.server.cors;

    let origins = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok()),
        )
    };

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(methods)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
