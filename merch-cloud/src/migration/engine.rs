//! Migration driver
//!
//! Every step is check-then-create, so a second run over the same legacy
//! data finds everything in place and creates nothing new.

use std::collections::HashSet;

use shared::models::{
    CatalogProduct, CatalogVariantCreate, ListingStatus, Store, StoreProduct, StoreProductVariant,
};
use shared::util::{now_millis, sku_prefix, synthesize_sku};
use thiserror::Error;

use super::legacy::{LegacyMerchant, LegacyProduct, LegacySource};
use super::report::{MigrationReport, MigrationStep};
use super::transform::{self, FALLBACK_COLOR, FALLBACK_SIZE, LegacyCatalogue};
use crate::catalog::service::insert_variants;
use crate::catalog::validation::validate_variant;
use crate::db::{LISTING_STORE_PRODUCT_KEY, RepoError, STORE_LEGACY_MERCHANT_KEY};
use crate::state::AppState;

#[derive(Debug, Error)]
enum EntityError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("unreadable catalogue: {0}")]
    Catalogue(#[from] serde_json::Error),
}

/// A catalog product together with the legacy facts step 5 needs
struct MigratedProduct {
    merchant_id: Option<String>,
    legacy_published: bool,
    product: CatalogProduct,
}

/// Run every step against `legacy`, writing through `state`.
///
/// Entity failures are collected into the report; the run always completes.
pub async fn run(state: &AppState, legacy: &dyn LegacySource) -> MigrationReport {
    let mut report = MigrationReport::default();
    tracing::info!("Legacy migration started");

    promote_users(legacy, &mut report).await;
    let products = migrate_products(state, legacy, &mut report).await;
    migrate_merchants(state, legacy, &products, &mut report).await;

    tracing::info!(
        users_promoted = report.users_promoted,
        products_created = report.catalog_products.created,
        products_skipped = report.catalog_products.skipped_existing,
        variants_created = report.variants.created,
        stores_created = report.stores.created,
        listings_created = report.listings.created,
        overrides_written = report.overrides_written,
        images_needing_reupload = report.images_needing_reupload,
        failures = report.failures.len(),
        "Legacy migration finished"
    );
    report
}

async fn promote_users(legacy: &dyn LegacySource, report: &mut MigrationReport) {
    match legacy.promote_admin_users().await {
        Ok(promoted) => {
            report.users_promoted = promoted;
            tracing::info!(promoted, "Admin users promoted to superadmin");
        }
        Err(e) => report.record_failure(MigrationStep::Users, "users", e.to_string()),
    }
}

async fn migrate_products(
    state: &AppState,
    legacy: &dyn LegacySource,
    report: &mut MigrationReport,
) -> Vec<MigratedProduct> {
    let legacy_products = match legacy.products().await {
        Ok(products) => products,
        Err(e) => {
            report.record_failure(MigrationStep::CatalogProducts, "legacy_products", e.to_string());
            return Vec::new();
        }
    };

    let mut migrated = Vec::with_capacity(legacy_products.len());
    for lp in &legacy_products {
        match migrate_product(state, legacy, lp, report).await {
            Ok(product) => migrated.push(MigratedProduct {
                merchant_id: lp.merchant_id.clone(),
                legacy_published: lp.is_published,
                product,
            }),
            Err(e) => {
                report.catalog_products.failed += 1;
                report.record_failure(MigrationStep::CatalogProducts, &lp.id, e.to_string());
            }
        }
    }
    migrated
}

/// Steps 2 and 3 for one legacy product
async fn migrate_product(
    state: &AppState,
    legacy: &dyn LegacySource,
    lp: &LegacyProduct,
    report: &mut MigrationReport,
) -> Result<CatalogProduct, EntityError> {
    let catalogue = LegacyCatalogue::parse(&lp.catalogue)?;

    let product = match state.repo.find_catalog_product_by_legacy_id(&lp.id).await? {
        Some(existing) => {
            report.catalog_products.skipped_existing += 1;
            existing
        }
        None => {
            let draft = transform::catalog_product_from_legacy(lp, &catalogue, now_millis());
            let product = state.repo.insert_catalog_product(draft.product).await?;
            report.catalog_products.created += 1;
            report.images_needing_reupload += draft.images_stripped;
            for note in draft.notes {
                report.record_failure(MigrationStep::CatalogProducts, &lp.id, note);
            }
            product
        }
    };

    // Re-run on existing products too, so an interrupted run is completed
    migrate_variants(state, legacy, lp, &catalogue, &product, report).await;
    Ok(product)
}

async fn migrate_variants(
    state: &AppState,
    legacy: &dyn LegacySource,
    lp: &LegacyProduct,
    catalogue: &LegacyCatalogue,
    product: &CatalogProduct,
    report: &mut MigrationReport,
) {
    let rows = match legacy.variant_rows(&lp.id).await {
        Ok(rows) => rows,
        Err(e) => {
            // Falling through to the embedded array would pick the wrong source
            report.record_failure(MigrationStep::Variants, &lp.id, e.to_string());
            return;
        }
    };

    let (inputs, source) = transform::variant_inputs(lp, catalogue, &rows, product.base_price);
    let mut valid = Vec::with_capacity(inputs.len());
    for input in inputs {
        match validate_variant(&input) {
            Ok(()) => valid.push(input),
            Err(e) => {
                report.variants.failed += 1;
                report.record_failure(
                    MigrationStep::Variants,
                    format!("{}:{}/{}", lp.id, input.size, input.color),
                    e.message,
                );
            }
        }
    }
    if let Err(e) = insert_and_count(state, product, &valid, report).await {
        report.variants.failed += valid.len();
        report.record_failure(MigrationStep::Variants, &lp.id, e.to_string());
        return;
    }

    // Every migrated product keeps at least one variant
    match state.repo.list_catalog_variants(product.id).await {
        Ok(variants) if variants.is_empty() => {
            if let Err(e) = insert_and_count(state, product, &[fallback_variant(lp)], report).await
            {
                report.record_failure(MigrationStep::Variants, &lp.id, e.to_string());
            }
        }
        Ok(_) => {}
        Err(e) => report.record_failure(MigrationStep::Variants, &lp.id, e.to_string()),
    }
    tracing::debug!(legacy_id = %lp.id, ?source, "Variants migrated");
}

fn fallback_variant(lp: &LegacyProduct) -> CatalogVariantCreate {
    let prefix = sku_prefix(&lp.name, &lp.id);
    CatalogVariantCreate {
        size: FALLBACK_SIZE.into(),
        color: FALLBACK_COLOR.into(),
        color_hex: None,
        sku: Some(synthesize_sku(&prefix, FALLBACK_SIZE, FALLBACK_COLOR)),
        price_override: None,
    }
}

async fn insert_and_count(
    state: &AppState,
    product: &CatalogProduct,
    inputs: &[CatalogVariantCreate],
    report: &mut MigrationReport,
) -> Result<(), RepoError> {
    let result = insert_variants(state.repo.as_ref(), product, inputs).await?;
    report.variants.created += result.created.len();
    report.variants.skipped_existing += result.conflicts.len();
    Ok(())
}

async fn migrate_merchants(
    state: &AppState,
    legacy: &dyn LegacySource,
    products: &[MigratedProduct],
    report: &mut MigrationReport,
) {
    let merchants = match legacy.merchants().await {
        Ok(merchants) => merchants,
        Err(e) => {
            report.record_failure(MigrationStep::Stores, "legacy_merchants", e.to_string());
            return;
        }
    };

    for merchant in &merchants {
        let store = match ensure_store(state, merchant, report).await {
            Ok(store) => store,
            Err(e) => {
                report.stores.failed += 1;
                report.record_failure(MigrationStep::Stores, &merchant.id, e.to_string());
                continue;
            }
        };

        let owned = products
            .iter()
            .filter(|p| p.merchant_id.as_deref() == Some(merchant.id.as_str()));
        for migrated in owned {
            if let Err(e) = ensure_listing(state, &store, migrated, report).await {
                report.listings.failed += 1;
                report.record_failure(
                    MigrationStep::Listings,
                    format!("{}:{}", merchant.id, migrated.product.id),
                    e.to_string(),
                );
            }
        }
    }
}

/// Step 4: exactly one store per legacy merchant
async fn ensure_store(
    state: &AppState,
    merchant: &LegacyMerchant,
    report: &mut MigrationReport,
) -> Result<Store, RepoError> {
    if let Some(existing) = state.repo.find_store_by_legacy_merchant(&merchant.id).await? {
        report.stores.skipped_existing += 1;
        return Ok(existing);
    }

    let slug = transform::store_slug(&merchant.name, &merchant.id);
    let name = match merchant.name.trim() {
        "" => slug.clone(),
        name => name.to_string(),
    };
    let store = Store {
        id: 0,
        slug,
        name,
        owner_id: merchant.owner_user_id.clone(),
        is_active: merchant.is_active,
        legacy_merchant_id: Some(merchant.id.clone()),
        created_at: now_millis(),
    };

    match state.repo.insert_store(store).await {
        Ok(created) => {
            report.stores.created += 1;
            tracing::info!(store_id = created.id, slug = %created.slug, "Store created");
            Ok(created)
        }
        Err(e) if e.is_duplicate_of(STORE_LEGACY_MERCHANT_KEY) => {
            let existing = state
                .repo
                .find_store_by_legacy_merchant(&merchant.id)
                .await?
                .ok_or(e)?;
            report.stores.skipped_existing += 1;
            Ok(existing)
        }
        Err(e) => Err(e),
    }
}

/// Step 5: one listing per (store, catalog product) plus its overrides
async fn ensure_listing(
    state: &AppState,
    store: &Store,
    migrated: &MigratedProduct,
    report: &mut MigrationReport,
) -> Result<(), RepoError> {
    let product = &migrated.product;
    let listing = match state
        .repo
        .find_listing_by_store_and_product(store.id, product.id)
        .await?
    {
        Some(existing) => {
            report.listings.skipped_existing += 1;
            existing
        }
        None => {
            let published = migrated.legacy_published && product.is_published;
            if migrated.legacy_published && !product.is_published {
                report.record_failure(
                    MigrationStep::Listings,
                    format!("{}:{}", store.id, product.id),
                    "catalog product not publishable, listing imported as draft",
                );
            }
            let now = now_millis();
            let listing = StoreProduct {
                id: 0,
                store_id: store.id,
                catalog_product_id: product.id,
                selling_price: transform::listing_price(product.base_price),
                compare_at_price: None,
                title: None,
                description: None,
                gallery: Vec::new(),
                design_data: serde_json::json!({}),
                status: if published {
                    ListingStatus::Published
                } else {
                    ListingStatus::Draft
                },
                published_at: published.then_some(now),
                variants_summary: Vec::new(),
                created_at: now,
                updated_at: now,
            };
            match state.repo.insert_listing(listing).await {
                Ok(created) => {
                    report.listings.created += 1;
                    created
                }
                Err(e) if e.is_duplicate_of(LISTING_STORE_PRODUCT_KEY) => {
                    report.listings.skipped_existing += 1;
                    state
                        .repo
                        .find_listing_by_store_and_product(store.id, product.id)
                        .await?
                        .ok_or(e)?
                }
                Err(e) => return Err(e),
            }
        }
    };

    // Only fill in missing overrides; existing rows may carry merchant edits
    let existing: HashSet<i64> = state
        .repo
        .list_variant_overrides(listing.id)
        .await?
        .into_iter()
        .map(|o| o.catalog_product_variant_id)
        .collect();
    let variants = state.repo.list_catalog_variants(product.id).await?;
    for variant in variants
        .iter()
        .filter(|v| v.is_active && !existing.contains(&v.id))
    {
        state
            .repo
            .upsert_variant_override(StoreProductVariant {
                id: 0,
                store_product_id: listing.id,
                catalog_product_variant_id: variant.id,
                sku: variant.sku_template.clone(),
                selling_price: None,
                is_active: true,
            })
            .await?;
        report.overrides_written += 1;
    }

    state.sync.sync(listing.id).await?;
    Ok(())
}
