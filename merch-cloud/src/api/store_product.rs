//! Listing handlers (merchant writes)
//!
//! Each write resolves and syncs `variantsSummary` before responding.

use axum::Extension;
use axum::extract::State;
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{
    ListingPatch, ListingStatus, ListingUpsert, StoreProduct, StoreProductVariant,
    VariantOverrideInput,
};

use super::ApiResult;
use super::extract::{Json, Path};
use crate::auth::Principal;
use crate::catalog::listing;
use crate::state::AppState;

pub async fn upsert(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<ListingUpsert>,
) -> ApiResult<StoreProduct> {
    let saved = listing::upsert_listing(&state, &principal, data).await?;
    Ok(ApiResponse::success(saved))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(data): Json<ListingPatch>,
) -> ApiResult<StoreProduct> {
    let saved = listing::update_listing(&state, &principal, id, data).await?;
    Ok(ApiResponse::success(saved))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    listing::delete_listing(&state, &principal, id).await?;
    Ok(ApiResponse::ok())
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ListingStatus,
}

pub async fn set_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(req): Json<StatusRequest>,
) -> ApiResult<StoreProduct> {
    let saved = listing::set_status(&state, &principal, id, req.status).await?;
    Ok(ApiResponse::success(saved))
}

pub async fn upsert_variant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(data): Json<VariantOverrideInput>,
) -> ApiResult<StoreProductVariant> {
    let saved = listing::upsert_variant_override(&state, &principal, id, data).await?;
    Ok(ApiResponse::success(saved))
}

pub async fn list_for_store(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(store_id): Path<i64>,
) -> ApiResult<Vec<StoreProduct>> {
    let listings = listing::list_store_listings(&state, &principal, store_id).await?;
    Ok(ApiResponse::success(listings))
}
