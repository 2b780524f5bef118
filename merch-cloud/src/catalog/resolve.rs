//! Variant resolution
//!
//! Which size/color combinations a listing sells, and at what price.
//!
//! 1. Active overrides whose catalog variant still exists and is active win,
//!    all-or-nothing: catalog variants without an override are not sold.
//! 2. With no usable override, every active catalog variant is sold at the
//!    listing's flat price, optionally narrowed by `selectedColors` /
//!    `selectedSizes` in the design data.
//!
//! Output is sorted by `(size, color)` then catalog variant id.

use std::collections::HashMap;

use shared::models::{
    CatalogProduct, CatalogVariant, ResolvedVariant, StoreProduct, StoreProductVariant,
};

use crate::db::{RepoResult, Repository};

/// Result of resolving one listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub variants: Vec<ResolvedVariant>,
    /// The catalog product no longer exists
    pub dangling: bool,
}

/// Resolve a listing against its catalog product, variants and overrides.
///
/// Pure: callers load the inputs. `product == None` means the catalog product
/// was hard-deleted.
pub fn resolve_variants(
    listing: &StoreProduct,
    product: Option<&CatalogProduct>,
    catalog_variants: &[CatalogVariant],
    overrides: &[StoreProductVariant],
) -> Resolution {
    let Some(product) = product else {
        return Resolution {
            variants: Vec::new(),
            dangling: true,
        };
    };

    let by_id: HashMap<i64, &CatalogVariant> = catalog_variants
        .iter()
        .filter(|v| v.catalog_product_id == product.id)
        .map(|v| (v.id, v))
        .collect();

    let mut variants: Vec<ResolvedVariant> = overrides
        .iter()
        .filter(|o| o.store_product_id == listing.id && o.is_active)
        .filter_map(|o| {
            let cv = by_id.get(&o.catalog_product_variant_id)?;
            if !cv.is_active {
                return None;
            }
            let sku = if o.sku.trim().is_empty() {
                cv.sku_template.clone()
            } else {
                o.sku.clone()
            };
            Some(ResolvedVariant {
                catalog_variant_id: cv.id,
                size: cv.size.clone(),
                color: cv.color.clone(),
                color_hex: cv.color_hex.clone(),
                sku,
                selling_price: o.selling_price.unwrap_or(listing.selling_price),
                production_cost: cv.production_cost(product.base_price),
            })
        })
        .collect();

    if variants.is_empty() {
        let colors = selection(&listing.design_data, "selectedColors");
        let sizes = selection(&listing.design_data, "selectedSizes");
        variants = catalog_variants
            .iter()
            .filter(|v| v.catalog_product_id == product.id && v.is_active)
            .filter(|v| matches_selection(colors.as_deref(), &v.color))
            .filter(|v| matches_selection(sizes.as_deref(), &v.size))
            .map(|cv| ResolvedVariant {
                catalog_variant_id: cv.id,
                size: cv.size.clone(),
                color: cv.color.clone(),
                color_hex: cv.color_hex.clone(),
                sku: cv.sku_template.clone(),
                selling_price: listing.selling_price,
                production_cost: cv.production_cost(product.base_price),
            })
            .collect();
    }

    variants.sort_by(|a, b| {
        a.size
            .cmp(&b.size)
            .then_with(|| a.color.cmp(&b.color))
            .then_with(|| a.catalog_variant_id.cmp(&b.catalog_variant_id))
    });

    Resolution {
        variants,
        dangling: false,
    }
}

/// Load a listing's inputs from the repository and resolve it
pub async fn resolve_listing(
    repo: &dyn Repository,
    listing: &StoreProduct,
) -> RepoResult<Resolution> {
    let product = repo.find_catalog_product(listing.catalog_product_id).await?;
    let (catalog_variants, overrides) = match &product {
        Some(p) => (
            repo.list_catalog_variants(p.id).await?,
            repo.list_variant_overrides(listing.id).await?,
        ),
        None => (Vec::new(), Vec::new()),
    };

    let resolution = resolve_variants(listing, product.as_ref(), &catalog_variants, &overrides);
    if resolution.dangling {
        tracing::warn!(
            listing_id = listing.id,
            catalog_product_id = listing.catalog_product_id,
            "Listing references a deleted catalog product"
        );
    }
    Ok(resolution)
}

/// Normalized filter values under `key`; `None` means no filter.
///
/// Absent keys, non-arrays, and arrays without usable strings all disable the filter.
fn selection(design_data: &serde_json::Value, key: &str) -> Option<Vec<String>> {
    let values: Vec<String> = design_data
        .get(key)?
        .as_array()?
        .iter()
        .filter_map(|v| v.as_str())
        .map(normalize)
        .filter(|v| !v.is_empty())
        .collect();
    (!values.is_empty()).then_some(values)
}

fn matches_selection(selection: Option<&[String]>, value: &str) -> bool {
    match selection {
        None => true,
        Some(values) => {
            let value = normalize(value);
            values.iter().any(|v| *v == value)
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use shared::models::{ListingStatus, PackageDimensions, ProductCategory};

    fn product(id: i64) -> CatalogProduct {
        CatalogProduct {
            id,
            name: "Tee".into(),
            description: String::new(),
            category: ProductCategory::Apparel,
            subcategory: "t_shirts".into(),
            attributes: json!({}),
            base_price: Decimal::from(100),
            tax_slab: 5,
            design_template: vec![],
            package: PackageDimensions::default(),
            gallery: vec![],
            is_published: true,
            is_active: true,
            listing_count: 0,
            legacy_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn variant(id: i64, size: &str, color: &str, price: Option<i64>) -> CatalogVariant {
        CatalogVariant {
            id,
            catalog_product_id: 1,
            size: size.into(),
            color: color.into(),
            color_hex: None,
            sku_template: format!("TEE-{size}-{color}").to_uppercase(),
            price_override: price.map(Decimal::from),
            is_active: true,
        }
    }

    fn listing(design_data: serde_json::Value) -> StoreProduct {
        StoreProduct {
            id: 50,
            store_id: 9,
            catalog_product_id: 1,
            selling_price: Decimal::from(250),
            compare_at_price: None,
            title: None,
            description: None,
            gallery: vec![],
            design_data,
            status: ListingStatus::Draft,
            published_at: None,
            variants_summary: vec![],
            created_at: 0,
            updated_at: 0,
        }
    }

    fn override_row(variant_id: i64, price: Option<i64>, sku: &str) -> StoreProductVariant {
        StoreProductVariant {
            id: variant_id + 1000,
            store_product_id: 50,
            catalog_product_variant_id: variant_id,
            sku: sku.into(),
            selling_price: price.map(Decimal::from),
            is_active: true,
        }
    }

    #[test]
    fn test_fallback_sells_all_active_variants_at_flat_price() {
        let p = product(1);
        let mut inactive = variant(3, "S", "Blue", None);
        inactive.is_active = false;
        let variants = vec![
            variant(2, "L", "Red", Some(110)),
            variant(1, "M", "Red", None),
            inactive,
        ];

        let r = resolve_variants(&listing(json!({})), Some(&p), &variants, &[]);
        assert!(!r.dangling);
        assert_eq!(r.variants.len(), 2);
        assert_eq!(r.variants[0].size, "L");
        assert_eq!(r.variants[0].production_cost, Decimal::from(110));
        assert_eq!(r.variants[1].production_cost, Decimal::from(100));
        assert!(r.variants.iter().all(|v| v.selling_price == Decimal::from(250)));
    }

    #[test]
    fn test_overrides_are_all_or_nothing() {
        let p = product(1);
        let variants = vec![variant(1, "M", "Red", None), variant(2, "L", "Red", Some(110))];
        let overrides = vec![override_row(1, Some(230), "")];

        let r = resolve_variants(&listing(json!({})), Some(&p), &variants, &overrides);
        assert_eq!(r.variants.len(), 1);
        assert_eq!(r.variants[0].catalog_variant_id, 1);
        assert_eq!(r.variants[0].selling_price, Decimal::from(230));
        assert_eq!(r.variants[0].sku, "TEE-M-RED");
    }

    #[test]
    fn test_override_sku_and_price_fallbacks() {
        let p = product(1);
        let variants = vec![variant(1, "M", "Red", None)];
        let overrides = vec![override_row(1, None, "MY-SKU")];

        let r = resolve_variants(&listing(json!({})), Some(&p), &variants, &overrides);
        assert_eq!(r.variants[0].sku, "MY-SKU");
        assert_eq!(r.variants[0].selling_price, Decimal::from(250));
    }

    #[test]
    fn test_orphaned_and_inactive_overrides_fall_back_to_catalog() {
        let p = product(1);
        let mut retired = variant(2, "L", "Red", None);
        retired.is_active = false;
        let variants = vec![variant(1, "M", "Red", None), retired];
        let mut off = override_row(1, Some(10), "");
        off.is_active = false;
        let overrides = vec![override_row(99, Some(10), ""), override_row(2, Some(10), ""), off];

        let r = resolve_variants(&listing(json!({})), Some(&p), &variants, &overrides);
        assert_eq!(r.variants.len(), 1);
        assert_eq!(r.variants[0].catalog_variant_id, 1);
        assert_eq!(r.variants[0].selling_price, Decimal::from(250));
    }

    #[test]
    fn test_design_data_filters_are_case_insensitive() {
        let p = product(1);
        let variants = vec![
            variant(1, "M", "Red", None),
            variant(2, "L", "Red", None),
            variant(3, "M", "Blue", None),
        ];
        let data = json!({ "selectedColors": [" red "], "selectedSizes": ["m", 4] });

        let r = resolve_variants(&listing(data), Some(&p), &variants, &[]);
        assert_eq!(r.variants.len(), 1);
        assert_eq!(r.variants[0].catalog_variant_id, 1);
    }

    #[test]
    fn test_malformed_filters_are_ignored() {
        let p = product(1);
        let variants = vec![variant(1, "M", "Red", None), variant(2, "L", "Red", None)];
        for data in [
            json!({ "selectedColors": "red" }),
            json!({ "selectedColors": [] }),
            json!({ "selectedSizes": [1, 2] }),
            json!(null),
        ] {
            let r = resolve_variants(&listing(data), Some(&p), &variants, &[]);
            assert_eq!(r.variants.len(), 2);
        }
    }

    #[test]
    fn test_deleted_product_is_dangling() {
        let r = resolve_variants(&listing(json!({})), None, &[], &[]);
        assert!(r.dangling);
        assert!(r.variants.is_empty());
    }

    #[test]
    fn test_sort_tie_breaks_on_variant_id() {
        let p = product(1);
        let variants = vec![variant(7, "M", "Red", None), variant(4, "M", "Red ", None)];
        let a = resolve_variants(&listing(json!({})), Some(&p), &variants, &[]);
        let reversed: Vec<CatalogVariant> = variants.iter().rev().cloned().collect();
        let b = resolve_variants(&listing(json!({})), Some(&p), &reversed, &[]);
        assert_eq!(a, b);
    }
}
