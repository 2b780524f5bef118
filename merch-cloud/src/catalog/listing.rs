//! Tenant listing operations
//!
//! Every write path here ends with `state.sync.sync(listing_id)` before it
//! returns, so the listing handed back carries a fresh `variants_summary`.

use std::collections::HashSet;

use shared::error::{AppError, ErrorCode};
use shared::models::{
    ListingPatch, ListingStatus, ListingUpsert, PublicListing, Store, StoreProduct,
    StoreProductVariant, VariantOverrideInput,
};
use shared::util::now_millis;

use super::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_listing_prices, validate_optional_text,
    validate_override, validate_urls,
};
use crate::auth::Principal;
use crate::db::{LISTING_STORE_PRODUCT_KEY, RepoError};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

fn listing_not_found(id: i64) -> ServiceError {
    AppError::with_message(ErrorCode::ListingNotFound, format!("Listing {id} not found")).into()
}

fn store_not_owned(store_id: i64) -> ServiceError {
    AppError::new(ErrorCode::StoreNotOwned)
        .with_detail("storeId", store_id)
        .into()
}

async fn load_store(state: &AppState, store_id: i64) -> ServiceResult<Store> {
    state.repo.find_store(store_id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::StoreNotFound, format!("Store {store_id} not found"))
            .into()
    })
}

/// Load a listing the principal may write to
async fn load_owned_listing(
    state: &AppState,
    principal: &Principal,
    listing_id: i64,
) -> ServiceResult<StoreProduct> {
    let listing = state
        .repo
        .find_listing(listing_id)
        .await?
        .ok_or_else(|| listing_not_found(listing_id))?;
    if !principal.can_manage_store(listing.store_id) {
        return Err(store_not_owned(listing.store_id));
    }
    Ok(listing)
}

fn validate_listing_text(
    title: &Option<String>,
    description: &Option<String>,
    gallery: &Option<Vec<String>>,
) -> Result<(), AppError> {
    validate_optional_text(title, "title", MAX_NAME_LEN)?;
    validate_optional_text(description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(gallery) = gallery {
        validate_urls(gallery, "gallery")?;
    }
    Ok(())
}

/// Every override must target a variant of the listing's catalog product
async fn check_override_targets(
    state: &AppState,
    catalog_product_id: i64,
    inputs: &[VariantOverrideInput],
) -> ServiceResult<()> {
    if inputs.is_empty() {
        return Ok(());
    }
    for input in inputs {
        validate_override(input)?;
    }
    let known: HashSet<i64> = state
        .repo
        .list_catalog_variants(catalog_product_id)
        .await?
        .into_iter()
        .map(|v| v.id)
        .collect();
    if let Some(bad) = inputs.iter().find(|i| !known.contains(&i.catalog_variant_id)) {
        return Err(AppError::new(ErrorCode::VariantNotInCatalogProduct)
            .with_detail("catalogVariantId", bad.catalog_variant_id)
            .with_detail("catalogProductId", catalog_product_id)
            .into());
    }
    Ok(())
}

/// Write override rows; the input fully describes each row
async fn write_overrides(
    state: &AppState,
    listing_id: i64,
    inputs: Vec<VariantOverrideInput>,
) -> ServiceResult<Vec<StoreProductVariant>> {
    let mut saved = Vec::with_capacity(inputs.len());
    for input in inputs {
        let row = state
            .repo
            .upsert_variant_override(StoreProductVariant {
                id: 0,
                store_product_id: listing_id,
                catalog_product_variant_id: input.catalog_variant_id,
                sku: input.sku.map(|s| s.trim().to_string()).unwrap_or_default(),
                selling_price: input.selling_price,
                is_active: input.is_active.unwrap_or(true),
            })
            .await?;
        saved.push(row);
    }
    Ok(saved)
}

fn dangling_reference(listing: &StoreProduct) -> ServiceError {
    AppError::with_message(
        ErrorCode::DanglingReference,
        format!(
            "Listing {} references deleted catalog product {}",
            listing.id, listing.catalog_product_id
        ),
    )
    .with_detail("listingId", listing.id)
    .with_detail("catalogProductId", listing.catalog_product_id)
    .into()
}

/// Going live needs an existing, active, published catalog product
async fn ensure_publishable(state: &AppState, listing: &StoreProduct) -> ServiceResult<()> {
    let Some(product) = state
        .repo
        .find_catalog_product(listing.catalog_product_id)
        .await?
    else {
        tracing::warn!(
            listing_id = listing.id,
            catalog_product_id = listing.catalog_product_id,
            "Publish refused, catalog product is gone"
        );
        return Err(dangling_reference(listing));
    };
    if !product.is_active {
        return Err(AppError::new(ErrorCode::CatalogProductInactive)
            .with_detail("catalogProductId", product.id)
            .into());
    }
    if !product.is_published {
        return Err(AppError::new(ErrorCode::CatalogProductNotPublished)
            .with_detail("catalogProductId", product.id)
            .into());
    }
    Ok(())
}

/// Draft→published stamps `published_at`; draft clears it
fn apply_status(listing: &mut StoreProduct, status: ListingStatus, now: i64) {
    match status {
        ListingStatus::Published => {
            if listing.status == ListingStatus::Draft {
                listing.published_at = Some(now);
            }
        }
        ListingStatus::Draft => listing.published_at = None,
    }
    listing.status = status;
}

/// Sync, then hand back the stored listing
async fn synced(state: &AppState, listing_id: i64) -> ServiceResult<StoreProduct> {
    state.sync.sync(listing_id).await?;
    state
        .repo
        .find_listing(listing_id)
        .await?
        .ok_or_else(|| listing_not_found(listing_id))
}

/// Create a listing, or update the one named by `input.id`
pub async fn upsert_listing(
    state: &AppState,
    principal: &Principal,
    input: ListingUpsert,
) -> ServiceResult<StoreProduct> {
    validate_listing_prices(input.selling_price, input.compare_at_price)?;
    validate_listing_text(&input.title, &input.description, &input.gallery)?;

    match input.id {
        Some(id) => update_from_upsert(state, principal, id, input).await,
        None => create_listing(state, principal, input).await,
    }
}

async fn create_listing(
    state: &AppState,
    principal: &Principal,
    input: ListingUpsert,
) -> ServiceResult<StoreProduct> {
    let store = load_store(state, input.store_id).await?;
    if !principal.can_manage_store(store.id) {
        return Err(store_not_owned(store.id));
    }

    let product = state
        .repo
        .find_catalog_product(input.catalog_product_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CatalogProductNotFound,
                format!("Catalog product {} not found", input.catalog_product_id),
            )
        })?;
    if !product.is_active {
        return Err(AppError::new(ErrorCode::CatalogProductInactive).into());
    }
    if !product.is_published {
        return Err(AppError::new(ErrorCode::CatalogProductNotPublished).into());
    }

    let overrides = input.variants.unwrap_or_default();
    check_override_targets(state, product.id, &overrides).await?;

    if state
        .repo
        .find_listing_by_store_and_product(store.id, product.id)
        .await?
        .is_some()
    {
        return Err(listing_conflict(store.id, product.id));
    }

    let now = now_millis();
    let listing = state
        .repo
        .insert_listing(StoreProduct {
            id: 0,
            store_id: store.id,
            catalog_product_id: product.id,
            selling_price: input.selling_price,
            compare_at_price: input.compare_at_price,
            title: input.title,
            description: input.description,
            gallery: input.gallery.unwrap_or_default(),
            design_data: input.design_data.unwrap_or_else(|| serde_json::json!({})),
            status: ListingStatus::Draft,
            published_at: None,
            variants_summary: Vec::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(key) if key == LISTING_STORE_PRODUCT_KEY => {
                listing_conflict(store.id, product.id)
            }
            other => other.into(),
        })?;

    write_overrides(state, listing.id, overrides).await?;
    tracing::info!(
        listing_id = listing.id,
        store_id = store.id,
        catalog_product_id = product.id,
        "Listing created"
    );
    synced(state, listing.id).await
}

fn listing_conflict(store_id: i64, catalog_product_id: i64) -> ServiceError {
    AppError::new(ErrorCode::ListingConflict)
        .with_detail("storeId", store_id)
        .with_detail("catalogProductId", catalog_product_id)
        .into()
}

async fn update_from_upsert(
    state: &AppState,
    principal: &Principal,
    id: i64,
    input: ListingUpsert,
) -> ServiceResult<StoreProduct> {
    let mut listing = load_owned_listing(state, principal, id).await?;
    if input.store_id != listing.store_id || input.catalog_product_id != listing.catalog_product_id
    {
        return Err(AppError::validation("storeId and catalogProductId cannot change")
            .with_detail("field", "catalogProductId")
            .into());
    }
    let overrides = input.variants.unwrap_or_default();
    check_override_targets(state, listing.catalog_product_id, &overrides).await?;

    listing.selling_price = input.selling_price;
    listing.compare_at_price = input.compare_at_price;
    listing.title = input.title;
    listing.description = input.description;
    if let Some(gallery) = input.gallery {
        listing.gallery = gallery;
    }
    if let Some(design_data) = input.design_data {
        listing.design_data = design_data;
    }
    listing.updated_at = now_millis();
    state.repo.update_listing(&listing).await?;

    write_overrides(state, id, overrides).await?;
    synced(state, id).await
}

/// Partial update
pub async fn update_listing(
    state: &AppState,
    principal: &Principal,
    id: i64,
    patch: ListingPatch,
) -> ServiceResult<StoreProduct> {
    let mut listing = load_owned_listing(state, principal, id).await?;

    let selling_price = patch.selling_price.unwrap_or(listing.selling_price);
    let compare_at_price = patch.compare_at_price.or(listing.compare_at_price);
    validate_listing_prices(selling_price, compare_at_price)?;
    validate_listing_text(&patch.title, &patch.description, &patch.gallery)?;
    let resync = patch.affects_resolution();
    let overrides = patch.variants.unwrap_or_default();
    check_override_targets(state, listing.catalog_product_id, &overrides).await?;
    if patch.status == Some(ListingStatus::Published) && listing.status == ListingStatus::Draft {
        ensure_publishable(state, &listing).await?;
    }

    let now = now_millis();
    listing.selling_price = selling_price;
    listing.compare_at_price = compare_at_price;
    if let Some(title) = patch.title {
        listing.title = Some(title);
    }
    if let Some(description) = patch.description {
        listing.description = Some(description);
    }
    if let Some(gallery) = patch.gallery {
        listing.gallery = gallery;
    }
    if let Some(design_data) = patch.design_data {
        listing.design_data = design_data;
    }
    if let Some(status) = patch.status {
        apply_status(&mut listing, status, now);
    }
    listing.updated_at = now;
    state.repo.update_listing(&listing).await?;

    write_overrides(state, id, overrides).await?;
    if resync {
        synced(state, id).await
    } else {
        Ok(listing)
    }
}

/// Move a listing between draft and published
pub async fn set_status(
    state: &AppState,
    principal: &Principal,
    id: i64,
    status: ListingStatus,
) -> ServiceResult<StoreProduct> {
    let mut listing = load_owned_listing(state, principal, id).await?;
    if status == ListingStatus::Published && listing.status == ListingStatus::Draft {
        ensure_publishable(state, &listing).await?;
    }
    let now = now_millis();
    apply_status(&mut listing, status, now);
    listing.updated_at = now;
    state.repo.update_listing(&listing).await?;
    tracing::info!(listing_id = id, status = status.as_str(), "Listing status changed");
    synced(state, id).await
}

/// Idempotent override upsert on `(listing, catalog variant)`
pub async fn upsert_variant_override(
    state: &AppState,
    principal: &Principal,
    listing_id: i64,
    input: VariantOverrideInput,
) -> ServiceResult<StoreProductVariant> {
    let listing = load_owned_listing(state, principal, listing_id).await?;
    let inputs = vec![input];
    check_override_targets(state, listing.catalog_product_id, &inputs).await?;
    let mut saved = write_overrides(state, listing_id, inputs).await?;
    state.sync.sync(listing_id).await?;
    saved
        .pop()
        .ok_or_else(|| AppError::internal("Override upsert returned nothing").into())
}

pub async fn delete_listing(
    state: &AppState,
    principal: &Principal,
    id: i64,
) -> ServiceResult<()> {
    load_owned_listing(state, principal, id).await?;
    if !state.repo.delete_listing(id).await? {
        return Err(listing_not_found(id));
    }
    tracing::info!(listing_id = id, "Listing deleted");
    Ok(())
}

/// Merchant index of a store's listings
pub async fn list_store_listings(
    state: &AppState,
    principal: &Principal,
    store_id: i64,
) -> ServiceResult<Vec<StoreProduct>> {
    let store = load_store(state, store_id).await?;
    if !principal.can_manage_store(store.id) {
        return Err(store_not_owned(store.id));
    }
    Ok(state.repo.list_listings_by_store(store_id).await?)
}

/// Storefront read of a published listing in an active store.
///
/// An empty summary is resolved inline and written back. A listing whose
/// catalog product was hard-deleted fails with `DanglingReference`.
pub async fn get_public_listing(
    state: &AppState,
    store_id: i64,
    listing_id: i64,
) -> ServiceResult<PublicListing> {
    let store = load_store(state, store_id).await?;
    if !store.is_active {
        return Err(AppError::new(ErrorCode::StoreInactive).into());
    }
    let listing = state
        .repo
        .find_listing(listing_id)
        .await?
        .filter(|l| l.store_id == store_id && l.status == ListingStatus::Published)
        .ok_or_else(|| listing_not_found(listing_id))?;

    let Some(product) = state
        .repo
        .find_catalog_product(listing.catalog_product_id)
        .await?
    else {
        tracing::warn!(
            listing_id,
            catalog_product_id = listing.catalog_product_id,
            "Storefront read of a dangling listing"
        );
        return Err(dangling_reference(&listing));
    };

    let variants = if listing.variants_summary.is_empty() {
        tracing::debug!(listing_id, "Empty variants_summary, repairing");
        state.sync.sync(listing_id).await?
    } else {
        listing.variants_summary
    };

    let gallery = if listing.gallery.is_empty() {
        product.gallery.iter().map(|g| g.url.clone()).collect()
    } else {
        listing.gallery
    };

    Ok(PublicListing {
        id: listing.id,
        store_id: listing.store_id,
        catalog_product_id: listing.catalog_product_id,
        title: listing.title.unwrap_or(product.name),
        description: listing.description.unwrap_or(product.description),
        selling_price: listing.selling_price,
        compare_at_price: listing.compare_at_price,
        gallery,
        variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn listing(status: ListingStatus, published_at: Option<i64>) -> StoreProduct {
        StoreProduct {
            id: 1,
            store_id: 1,
            catalog_product_id: 1,
            selling_price: Decimal::from(10),
            compare_at_price: None,
            title: None,
            description: None,
            gallery: vec![],
            design_data: serde_json::json!({}),
            status,
            published_at,
            variants_summary: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_publish_stamps_only_on_transition() {
        let mut l = listing(ListingStatus::Draft, None);
        apply_status(&mut l, ListingStatus::Published, 100);
        assert_eq!(l.published_at, Some(100));

        apply_status(&mut l, ListingStatus::Published, 200);
        assert_eq!(l.published_at, Some(100));

        apply_status(&mut l, ListingStatus::Draft, 300);
        assert_eq!(l.status, ListingStatus::Draft);
        assert_eq!(l.published_at, None);
    }
}
