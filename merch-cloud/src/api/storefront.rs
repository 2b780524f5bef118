//! Public storefront reads

use axum::extract::State;
use shared::error::ApiResponse;
use shared::models::PublicListing;

use super::ApiResult;
use super::extract::Path;
use crate::catalog::listing;
use crate::state::AppState;

/// `product_id` is the listing id within the store
pub async fn get_listing(
    State(state): State<AppState>,
    Path((store_id, product_id)): Path<(i64, i64)>,
) -> ApiResult<PublicListing> {
    let view = listing::get_public_listing(&state, store_id, product_id).await?;
    Ok(ApiResponse::success(view))
}
