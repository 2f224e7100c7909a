//! HTTP API server for the storefront checkout system.
//!
//! Provides REST endpoints for cart and address management and the single
//! checkout entry point, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use checkout::{CheckoutCoordinator, InMemoryOrderingService};
use domain::{InMemoryAddressBook, InMemoryCartStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/cart/{customer_id}", get(routes::cart::get))
        .route("/cart/{customer_id}/items", post(routes::cart::add_item))
        .route(
            "/cart/{customer_id}/items/{item_id}",
            patch(routes::cart::update_item),
        )
        .route(
            "/cart/{customer_id}/items/{item_id}",
            delete(routes::cart::remove_item),
        )
        .route("/addresses/{customer_id}", get(routes::addresses::list))
        .route("/addresses/{customer_id}", post(routes::addresses::create))
        .route(
            "/addresses/{customer_id}/{address_id}/default",
            post(routes::addresses::set_default),
        )
        .route(
            "/addresses/{customer_id}/{address_id}",
            delete(routes::addresses::delete),
        )
        .route("/checkout/{customer_id}", post(routes::orders::place))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state with in-memory collaborators.
pub fn create_default_state() -> Arc<AppState> {
    let cart = InMemoryCartStore::new();
    let addresses = InMemoryAddressBook::new();
    let ordering = InMemoryOrderingService::new();
    let coordinator = CheckoutCoordinator::new(cart.clone(), addresses.clone(), ordering.clone());

    Arc::new(AppState {
        cart,
        addresses,
        ordering,
        coordinator,
    })
}
