//! API routes for merch-cloud

pub mod catalog;
pub mod extract;
pub mod health;
pub mod store_product;
pub mod storefront;

use std::time::Duration;

use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::error::ApiResponse;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::tenant_auth_middleware;
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<ApiResponse<T>, ServiceError>;

/// Create the combined router
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    // Management API (JWT authenticated)
    let management = Router::new()
        .route(
            "/api/catalog-products",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/api/catalog-products/{id}",
            get(catalog::get_product)
                .patch(catalog::update_product)
                .delete(catalog::delete_product),
        )
        .route(
            "/api/catalog-products/{id}/variants",
            post(catalog::create_variants),
        )
        .route(
            "/api/catalog-products/{id}/publish",
            post(catalog::publish_product),
        )
        .route("/api/catalog-variants", post(catalog::create_variant))
        .route(
            "/api/catalog-variants/{id}/deactivate",
            post(catalog::deactivate_variant),
        )
        .route("/api/store-products", post(store_product::upsert))
        .route(
            "/api/store-products/{id}",
            axum::routing::patch(store_product::update).delete(store_product::delete),
        )
        .route(
            "/api/store-products/{id}/status",
            post(store_product::set_status),
        )
        .route(
            "/api/store-products/{id}/variants",
            post(store_product::upsert_variant),
        )
        .route(
            "/api/stores/{store_id}/store-products",
            get(store_product::list_for_store),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_auth_middleware,
        ));

    // Storefront reads (no auth)
    let public = Router::new().route(
        "/api/store-products/public/{store_id}/{product_id}",
        get(storefront::get_listing),
    );

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(management)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
