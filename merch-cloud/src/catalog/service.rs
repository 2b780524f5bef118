//! Global catalog operations
//!
//! Operator-side writes on catalog products and variants. Edits that change
//! what listings resolve to end with a re-sync of that product's listings.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    BulkVariantResult, CatalogProduct, CatalogProductCreate, CatalogProductDetail,
    CatalogProductUpdate, CatalogVariant, CatalogVariantCreate, CatalogVariantView, DeletePolicy,
    ListingStatus, VariantConflict, VariantConflictReason,
};
use shared::util::{now_millis, sku_prefix, synthesize_sku};

use super::validation::{
    DEFAULT_TAX_SLAB, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_category,
    validate_design_template, validate_optional_text, validate_price, validate_publishable,
    validate_required_text, validate_tax_slab, validate_urls, validate_variant,
};
use crate::db::{RepoError, RepoResult, Repository, VARIANT_SKU_KEY};
use crate::error::{ServiceError, ServiceResult};
use crate::state::AppState;

fn product_not_found(id: i64) -> ServiceError {
    AppError::with_message(
        ErrorCode::CatalogProductNotFound,
        format!("Catalog product {id} not found"),
    )
    .into()
}

async fn load_product(state: &AppState, id: i64) -> ServiceResult<CatalogProduct> {
    state
        .repo
        .find_catalog_product(id)
        .await?
        .ok_or_else(|| product_not_found(id))
}

/// Product with its active variants, in resolution order
pub async fn product_detail(
    repo: &dyn Repository,
    product: CatalogProduct,
) -> RepoResult<CatalogProductDetail> {
    let mut variants: Vec<CatalogVariant> = repo
        .list_catalog_variants(product.id)
        .await?
        .into_iter()
        .filter(|v| v.is_active)
        .collect();
    variants.sort_by(|a, b| {
        a.size
            .cmp(&b.size)
            .then_with(|| a.color.cmp(&b.color))
            .then_with(|| a.id.cmp(&b.id))
    });
    let views = variants
        .iter()
        .map(|v| CatalogVariantView::from_variant(v, product.base_price))
        .collect();
    Ok(CatalogProductDetail {
        product,
        variants: views,
        conflicts: Vec::new(),
    })
}

/// Insert variants one by one, collecting unique-key collisions instead of aborting.
///
/// Inputs must already be validated.
pub async fn insert_variants(
    repo: &dyn Repository,
    product: &CatalogProduct,
    inputs: &[CatalogVariantCreate],
) -> RepoResult<BulkVariantResult> {
    let prefix = sku_prefix(&product.name, &product.id.to_string());
    let mut result = BulkVariantResult::default();

    for input in inputs {
        let size = input.size.trim().to_string();
        let color = input.color.trim().to_string();
        let sku = match input.sku.as_deref().map(str::trim) {
            Some(sku) if !sku.is_empty() => sku.to_string(),
            _ => synthesize_sku(&prefix, &size, &color),
        };
        let variant = CatalogVariant {
            id: 0,
            catalog_product_id: product.id,
            size,
            color,
            color_hex: input.color_hex.clone(),
            sku_template: sku,
            price_override: input.price_override,
            is_active: true,
        };

        match repo.insert_catalog_variant(variant.clone()).await {
            Ok(created) => result.created.push(created),
            Err(RepoError::Duplicate(key)) => {
                let reason = if key == VARIANT_SKU_KEY {
                    VariantConflictReason::DuplicateSku
                } else {
                    VariantConflictReason::DuplicateSizeColor
                };
                result.conflicts.push(VariantConflict {
                    size: variant.size,
                    color: variant.color,
                    sku: variant.sku_template,
                    reason,
                });
            }
            Err(e) => return Err(e),
        }
    }

    if !result.conflicts.is_empty() {
        tracing::info!(
            catalog_product_id = product.id,
            created = result.created.len(),
            conflicts = result.conflicts.len(),
            "Bulk variant insert skipped colliding keys"
        );
    }
    Ok(result)
}

/// Create a catalog product with its initial variants.
///
/// `require_media` enforces the publish rules even for drafts (HTTP path).
pub async fn create_catalog_product(
    state: &AppState,
    input: CatalogProductCreate,
    require_media: bool,
) -> ServiceResult<CatalogProductDetail> {
    validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&input.description, "description", MAX_DESCRIPTION_LEN)?;
    let category = validate_category(&input.category, &input.subcategory)?;
    validate_price(input.base_price, "basePrice")?;
    let tax_slab = input.tax_slab.unwrap_or(DEFAULT_TAX_SLAB);
    validate_tax_slab(tax_slab)?;
    validate_design_template(&input.design_template)?;
    let gallery_urls: Vec<String> = input.gallery.iter().map(|g| g.url.clone()).collect();
    validate_urls(&gallery_urls, "gallery")?;

    let is_published = input.is_published.unwrap_or(false);
    if require_media || is_published {
        validate_publishable(&input.design_template, &input.gallery)?;
    }
    for variant in &input.variants {
        validate_variant(variant)?;
    }

    let now = now_millis();
    let product = state
        .repo
        .insert_catalog_product(CatalogProduct {
            id: 0,
            name: input.name.trim().to_string(),
            description: input.description.unwrap_or_default(),
            category,
            subcategory: input.subcategory,
            attributes: input.attributes.unwrap_or_else(|| serde_json::json!({})),
            base_price: input.base_price,
            tax_slab,
            design_template: input.design_template,
            package: input.package.unwrap_or_default(),
            gallery: input.gallery,
            is_published,
            is_active: true,
            listing_count: 0,
            legacy_id: None,
            created_at: now,
            updated_at: now,
        })
        .await?;

    let bulk = insert_variants(state.repo.as_ref(), &product, &input.variants).await?;
    tracing::info!(
        catalog_product_id = product.id,
        variants = bulk.created.len(),
        "Catalog product created"
    );

    let mut detail = product_detail(state.repo.as_ref(), product).await?;
    detail.conflicts = bulk.conflicts;
    Ok(detail)
}

/// Bulk-create variants; collisions are reported, never fatal
pub async fn create_catalog_variants(
    state: &AppState,
    product_id: i64,
    inputs: Vec<CatalogVariantCreate>,
) -> ServiceResult<BulkVariantResult> {
    for input in &inputs {
        validate_variant(input)?;
    }
    let product = load_product(state, product_id).await?;
    let result = insert_variants(state.repo.as_ref(), &product, &inputs).await?;
    if !result.created.is_empty() {
        state.sync.resync_catalog_product(product_id).await?;
    }
    Ok(result)
}

/// Single-variant create; a collision is an error
pub async fn create_catalog_variant(
    state: &AppState,
    product_id: i64,
    input: CatalogVariantCreate,
) -> ServiceResult<CatalogVariant> {
    let mut result = create_catalog_variants(state, product_id, vec![input]).await?;
    if let Some(conflict) = result.conflicts.pop() {
        let code = match conflict.reason {
            VariantConflictReason::DuplicateSku => ErrorCode::SkuConflict,
            VariantConflictReason::DuplicateSizeColor => ErrorCode::VariantConflict,
        };
        return Err(AppError::new(code)
            .with_detail("size", conflict.size)
            .with_detail("color", conflict.color)
            .with_detail("sku", conflict.sku)
            .into());
    }
    result
        .created
        .pop()
        .ok_or_else(|| AppError::internal("Variant insert returned nothing").into())
}

/// Retire a variant and re-sync every listing of its product
pub async fn deactivate_variant(state: &AppState, variant_id: i64) -> ServiceResult<CatalogVariant> {
    let mut variant = state
        .repo
        .find_catalog_variant(variant_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::CatalogVariantNotFound,
                format!("Catalog variant {variant_id} not found"),
            )
        })?;

    if variant.is_active {
        state
            .repo
            .set_catalog_variant_active(variant_id, false)
            .await?;
        variant.is_active = false;
    }
    let synced = state
        .sync
        .resync_catalog_product(variant.catalog_product_id)
        .await?;
    tracing::info!(variant_id, listings = synced, "Catalog variant deactivated");
    Ok(variant)
}

/// One-way publish; re-checks media rules
pub async fn publish_catalog_product(state: &AppState, id: i64) -> ServiceResult<CatalogProduct> {
    let mut product = load_product(state, id).await?;
    if !product.is_active {
        return Err(AppError::new(ErrorCode::CatalogProductInactive).into());
    }
    validate_publishable(&product.design_template, &product.gallery)?;
    if !product.is_published {
        product.is_published = true;
        product.updated_at = now_millis();
        state.repo.update_catalog_product(&product).await?;
        tracing::info!(catalog_product_id = id, "Catalog product published");
    }
    Ok(product)
}

/// Partial edit of a catalog product
pub async fn update_catalog_product(
    state: &AppState,
    id: i64,
    patch: CatalogProductUpdate,
) -> ServiceResult<CatalogProductDetail> {
    let mut product = load_product(state, id).await?;

    if let Some(name) = &patch.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&patch.description, "description", MAX_DESCRIPTION_LEN)?;
    if patch.category.is_some() || patch.subcategory.is_some() {
        let category = patch
            .category
            .clone()
            .unwrap_or_else(|| product.category.as_str().to_string());
        let subcategory = patch
            .subcategory
            .clone()
            .unwrap_or_else(|| product.subcategory.clone());
        product.category = validate_category(&category, &subcategory)?;
        product.subcategory = subcategory;
    }
    if let Some(price) = patch.base_price {
        validate_price(price, "basePrice")?;
    }
    if let Some(slab) = patch.tax_slab {
        validate_tax_slab(slab)?;
    }
    if let Some(views) = &patch.design_template {
        validate_design_template(views)?;
    }
    if let Some(gallery) = &patch.gallery {
        let urls: Vec<String> = gallery.iter().map(|g| g.url.clone()).collect();
        validate_urls(&urls, "gallery")?;
    }

    let price_changed = patch
        .base_price
        .is_some_and(|price| price != product.base_price);

    if let Some(name) = patch.name {
        product.name = name.trim().to_string();
    }
    if let Some(description) = patch.description {
        product.description = description;
    }
    if let Some(attributes) = patch.attributes {
        product.attributes = attributes;
    }
    if let Some(price) = patch.base_price {
        product.base_price = price;
    }
    if let Some(slab) = patch.tax_slab {
        product.tax_slab = slab;
    }
    if let Some(views) = patch.design_template {
        product.design_template = views;
    }
    if let Some(package) = patch.package {
        product.package = package;
    }
    if let Some(gallery) = patch.gallery {
        product.gallery = gallery;
    }
    // Published products must stay publishable
    if product.is_published {
        validate_publishable(&product.design_template, &product.gallery)?;
    }

    product.updated_at = now_millis();
    state.repo.update_catalog_product(&product).await?;

    if price_changed {
        state.sync.resync_catalog_product(id).await?;
    }
    Ok(product_detail(state.repo.as_ref(), product).await?)
}

/// Delete under the given policy
pub async fn delete_catalog_product(
    state: &AppState,
    id: i64,
    policy: DeletePolicy,
) -> ServiceResult<()> {
    load_product(state, id).await?;
    let listings = state.repo.list_listings_by_catalog_product(id).await?;

    match policy {
        DeletePolicy::Strict => {
            let published = listings
                .iter()
                .filter(|l| l.status == ListingStatus::Published)
                .count();
            if published > 0 {
                return Err(AppError::new(ErrorCode::CatalogProductInUse)
                    .with_detail("publishedListings", published)
                    .into());
            }
            state.repo.delete_catalog_product(id).await?;
            tracing::info!(
                catalog_product_id = id,
                draft_listings = listings.len(),
                "Catalog product deleted"
            );
        }
        DeletePolicy::Deactivate => {
            state
                .repo
                .deactivate_catalog_product(id, now_millis())
                .await?;
            tracing::info!(catalog_product_id = id, "Catalog product deactivated");
        }
    }

    for listing in &listings {
        state.sync.sync(listing.id).await?;
    }
    Ok(())
}

/// Product with active variants.
///
/// Without `include_unpublished`, unpublished or inactive products read as absent.
pub async fn get_catalog_product(
    state: &AppState,
    id: i64,
    include_unpublished: bool,
) -> ServiceResult<CatalogProductDetail> {
    let product = load_product(state, id).await?;
    if !include_unpublished && !(product.is_published && product.is_active) {
        return Err(product_not_found(id));
    }
    Ok(product_detail(state.repo.as_ref(), product).await?)
}

pub async fn list_catalog_products(
    state: &AppState,
    published_only: bool,
) -> ServiceResult<Vec<CatalogProduct>> {
    Ok(state.repo.list_catalog_products(published_only).await?)
}
