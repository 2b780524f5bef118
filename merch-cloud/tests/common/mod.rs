//! Shared fixtures for merch-cloud integration tests
#![allow(dead_code)]

use std::sync::Arc;

use merch_cloud::AppState;
use merch_cloud::auth::Principal;
use merch_cloud::catalog::service;
use merch_cloud::db::MemoryRepository;
use merch_cloud::error::ServiceError;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CatalogProductCreate, CatalogProductDetail, CatalogVariantCreate, DesignView, GalleryImage,
    ListingUpsert, Role, Store, StoreProduct,
};
use shared::util::now_millis;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

pub fn state() -> AppState {
    AppState::with_repository(Arc::new(MemoryRepository::new()), SECRET)
}

pub fn dec(value: i64) -> Decimal {
    Decimal::from(value)
}

pub fn operator() -> Principal {
    Principal {
        user_id: "operator".into(),
        role: Role::Superadmin,
        owned_store_ids: vec![],
    }
}

pub fn merchant(user_id: &str, store_ids: &[i64]) -> Principal {
    Principal {
        user_id: user_id.into(),
        role: Role::Merchant,
        owned_store_ids: store_ids.to_vec(),
    }
}

pub fn code_of(err: ServiceError) -> ErrorCode {
    AppError::from(err).code
}

pub fn variant(size: &str, color: &str, price_override: Option<i64>) -> CatalogVariantCreate {
    CatalogVariantCreate {
        size: size.into(),
        color: color.into(),
        color_hex: None,
        sku: None,
        price_override: price_override.map(Decimal::from),
    }
}

/// Create payload that passes the media rules
pub fn product_input(
    name: &str,
    base_price: i64,
    published: bool,
    variants: Vec<CatalogVariantCreate>,
) -> CatalogProductCreate {
    CatalogProductCreate {
        name: name.into(),
        description: Some(format!("{name} blank")),
        category: "apparel".into(),
        subcategory: "t_shirts".into(),
        attributes: None,
        base_price: dec(base_price),
        tax_slab: None,
        design_template: vec![DesignView {
            name: "front".into(),
            mockup_url: "https://cdn.example.com/front.png".into(),
            placeholders: vec![],
        }],
        package: None,
        gallery: vec![GalleryImage {
            url: "https://cdn.example.com/gallery-1.png".into(),
            is_primary: true,
        }],
        is_published: Some(published),
        variants,
    }
}

pub async fn seed_product(
    state: &AppState,
    name: &str,
    base_price: i64,
    variants: Vec<CatalogVariantCreate>,
) -> CatalogProductDetail {
    service::create_catalog_product(state, product_input(name, base_price, true, variants), true)
        .await
        .unwrap()
}

pub async fn seed_store(state: &AppState, owner_id: &str, slug: &str, is_active: bool) -> Store {
    state
        .repo
        .insert_store(Store {
            id: 0,
            slug: slug.into(),
            name: slug.into(),
            owner_id: owner_id.into(),
            is_active,
            legacy_merchant_id: None,
            created_at: now_millis(),
        })
        .await
        .unwrap()
}

pub fn listing_input(store_id: i64, catalog_product_id: i64, selling_price: i64) -> ListingUpsert {
    ListingUpsert {
        id: None,
        store_id,
        catalog_product_id,
        selling_price: dec(selling_price),
        compare_at_price: None,
        title: None,
        description: None,
        gallery: None,
        design_data: None,
        variants: None,
    }
}

/// Stored listing must equal a fresh resolution
pub async fn assert_summary_fresh(state: &AppState, listing_id: i64) -> StoreProduct {
    let listing = state.repo.find_listing(listing_id).await.unwrap().unwrap();
    let resolution = merch_cloud::catalog::resolve_listing(state.repo.as_ref(), &listing)
        .await
        .unwrap();
    assert_eq!(listing.variants_summary, resolution.variants);
    listing
}
