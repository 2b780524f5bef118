//! Catalog product handlers (operator writes, merchant reads)

use axum::Extension;
use axum::extract::State;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{
    BulkVariantResult, CatalogProduct, CatalogProductCreate, CatalogProductDetail,
    CatalogProductUpdate, CatalogVariant, CatalogVariantCreate, DeletePolicy,
};

use super::ApiResult;
use super::extract::{Json, Path, Query};
use crate::auth::Principal;
use crate::catalog::service;
use crate::state::AppState;

pub async fn list_products(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<CatalogProduct>> {
    let published_only = !principal.is_superadmin();
    let products = service::list_catalog_products(&state, published_only).await?;
    Ok(ApiResponse::success(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<CatalogProductDetail> {
    let detail = service::get_catalog_product(&state, id, principal.is_superadmin()).await?;
    Ok(ApiResponse::success(detail))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CatalogProductCreate>,
) -> ApiResult<CatalogProductDetail> {
    principal.require_superadmin()?;
    let detail = service::create_catalog_product(&state, data, true).await?;
    Ok(ApiResponse::success(detail))
}

pub async fn update_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(data): Json<CatalogProductUpdate>,
) -> ApiResult<CatalogProductDetail> {
    principal.require_superadmin()?;
    let detail = service::update_catalog_product(&state, id, data).await?;
    Ok(ApiResponse::success(detail))
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub policy: DeletePolicy,
}

pub async fn delete_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<()> {
    principal.require_superadmin()?;
    service::delete_catalog_product(&state, id, query.policy).await?;
    Ok(ApiResponse::ok())
}

pub async fn create_variants(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(data): Json<Vec<CatalogVariantCreate>>,
) -> ApiResult<BulkVariantResult> {
    principal.require_superadmin()?;
    let result = service::create_catalog_variants(&state, id, data).await?;
    Ok(ApiResponse::success(result))
}

/// Single variant create body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCreateRequest {
    pub catalog_product_id: i64,
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    pub sku: Option<String>,
    pub price_override: Option<Decimal>,
}

pub async fn create_variant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<VariantCreateRequest>,
) -> ApiResult<CatalogVariant> {
    principal.require_superadmin()?;
    let input = CatalogVariantCreate {
        size: req.size,
        color: req.color,
        color_hex: req.color_hex,
        sku: req.sku,
        price_override: req.price_override,
    };
    let variant = service::create_catalog_variant(&state, req.catalog_product_id, input).await?;
    Ok(ApiResponse::success(variant))
}

pub async fn publish_product(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<CatalogProduct> {
    principal.require_superadmin()?;
    let product = service::publish_catalog_product(&state, id).await?;
    Ok(ApiResponse::success(product))
}

pub async fn deactivate_variant(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<CatalogVariant> {
    principal.require_superadmin()?;
    let variant = service::deactivate_variant(&state, id).await?;
    Ok(ApiResponse::success(variant))
}
