//! Legacy migration against an in-memory legacy dataset

mod common;

use common::*;
use merch_cloud::AppState;
use merch_cloud::migration::legacy::{
    LegacyMerchant, LegacyProduct, LegacySnapshot, LegacyUser, LegacyVariantRow,
};
use merch_cloud::migration::{self, MigrationStep};
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::ListingStatus;
use tokio::sync::Mutex;

fn merchant_row(id: &str, name: &str, owner: &str) -> LegacyMerchant {
    LegacyMerchant {
        id: id.into(),
        name: name.into(),
        owner_user_id: owner.into(),
        is_active: true,
    }
}

fn product_row(id: &str, merchant_id: &str, name: &str, published: bool, catalogue: serde_json::Value) -> LegacyProduct {
    LegacyProduct {
        id: id.into(),
        merchant_id: Some(merchant_id.into()),
        name: name.into(),
        is_published: published,
        catalogue,
    }
}

fn media() -> serde_json::Value {
    json!({
        "designViews": [{"name": "front", "mockupUrl": "https://cdn.example.com/front.png"}],
        "gallery": [{"url": "https://cdn.example.com/1.png", "isPrimary": true}]
    })
}

fn with_media(mut catalogue: serde_json::Value) -> serde_json::Value {
    if let (Some(target), Some(extra)) = (catalogue.as_object_mut(), media().as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    catalogue
}

fn legacy_dataset() -> LegacySnapshot {
    LegacySnapshot {
        users: Mutex::new(vec![
            LegacyUser {
                id: "u-admin".into(),
                email: "ops@example.com".into(),
                role: "admin".into(),
            },
            LegacyUser {
                id: "u-ravi".into(),
                email: "ravi@example.com".into(),
                role: "merchant".into(),
            },
        ]),
        merchants: vec![
            merchant_row("64f0c1a2b3c4d5e6", "Ravi's Tees", "u-ravi"),
            merchant_row("64f0c1a2b3c4ffff", "Empty Shop", "u-empty"),
        ],
        products: vec![
            // Variant table rows
            product_row(
                "lp-table",
                "64f0c1a2b3c4d5e6",
                "Classic Tee",
                true,
                with_media(json!({
                    "category": "apparel",
                    "subcategory": "t_shirts",
                    "basePrice": 100,
                    "variants": [{"size": "XXL", "color": "Green"}]
                })),
            ),
            // Embedded variants, no mockup
            product_row(
                "lp-embedded",
                "64f0c1a2b3c4d5e6",
                "Mug",
                true,
                json!({
                    "category": "home_living",
                    "subcategory": "mugs",
                    "basePrice": 80,
                    "designViews": [{"name": "wrap", "mockupUrl": "data:image/png;base64,AAAA"}],
                    "gallery": ["data:image/png;base64,BBBB"],
                    "variants": [
                        {"size": "11oz", "color": "White", "sku": "MUG-11-W"},
                        {"size": "15oz", "color": "White", "price": 95}
                    ]
                }),
            ),
            // Sizes × colors
            product_row(
                "lp-matrix",
                "64f0c1a2b3c4d5e6",
                "Hoodie",
                false,
                with_media(json!({
                    "category": "apparel",
                    "subcategory": "hoodies",
                    "basePrice": 400,
                    "availableSizes": ["S", "M"],
                    "availableColors": ["Black", {"name": "Grey", "hex": "#808080"}]
                })),
            ),
            // Nothing known about variants
            product_row(
                "lp-bare",
                "64f0c1a2b3c4d5e6",
                "Sticker",
                false,
                json!({"category": "stickers", "basePrice": -3}),
            ),
            // Unreadable catalogue
            product_row(
                "lp-broken",
                "64f0c1a2b3c4d5e6",
                "Broken",
                true,
                json!({"availableSizes": "S,M,L"}),
            ),
        ],
        variant_rows: vec![
            LegacyVariantRow {
                id: "v1".into(),
                product_id: "lp-table".into(),
                size: "M".into(),
                color: "Red".into(),
                color_hex: Some("#FF0000".into()),
                sku: Some("CT-M-RED".into()),
                price: Some(Decimal::from(100)),
            },
            LegacyVariantRow {
                id: "v2".into(),
                product_id: "lp-table".into(),
                size: "L".into(),
                color: "Red".into(),
                color_hex: Some("red".into()),
                sku: None,
                price: Some(Decimal::from(110)),
            },
        ],
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Counts {
    products: usize,
    variants: usize,
    stores: usize,
    listings: usize,
    overrides: usize,
}

async fn counts(state: &AppState) -> Counts {
    let products = state.repo.list_catalog_products(false).await.unwrap();
    let mut variants = 0;
    for p in &products {
        variants += state.repo.list_catalog_variants(p.id).await.unwrap().len();
    }
    let mut stores = 0;
    let mut listings = 0;
    let mut overrides = 0;
    for owner in ["u-ravi", "u-empty"] {
        for store_id in state.repo.list_store_ids_by_owner(owner).await.unwrap() {
            stores += 1;
            for l in state.repo.list_listings_by_store(store_id).await.unwrap() {
                listings += 1;
                overrides += state.repo.list_variant_overrides(l.id).await.unwrap().len();
            }
        }
    }
    Counts {
        products: products.len(),
        variants,
        stores,
        listings,
        overrides,
    }
}

#[tokio::test]
async fn test_first_run_builds_layered_model() {
    let state = state();
    let legacy = legacy_dataset();

    let report = migration::run(&state, &legacy).await;

    assert_eq!(report.users_promoted, 1);
    assert_eq!(legacy.users.lock().await[0].role, "superadmin");
    assert_eq!(report.catalog_products.created, 4);
    assert_eq!(report.catalog_products.failed, 1);
    assert!(report.failures.iter().any(|f| {
        f.step == MigrationStep::CatalogProducts
            && f.entity == "lp-broken"
            && f.message.starts_with("unreadable catalogue")
    }));
    assert_eq!(report.images_needing_reupload, 2);
    // table 2 + embedded 2 + matrix 4 + fallback 1
    assert_eq!(report.variants.created, 9);
    assert_eq!(report.stores.created, 2);
    assert_eq!(report.listings.created, 4);
    assert_eq!(report.overrides_written, 9);

    let table = state
        .repo
        .find_catalog_product_by_legacy_id("lp-table")
        .await
        .unwrap()
        .unwrap();
    assert!(table.is_published);
    let variants = state.repo.list_catalog_variants(table.id).await.unwrap();
    let large = variants.iter().find(|v| v.size == "L").unwrap();
    assert_eq!(large.price_override, Some(Decimal::from(110)));
    assert_eq!(large.sku_template, "CLASSIABLE-L-RED");
    assert_eq!(large.color_hex, None);

    let bare = state
        .repo
        .find_catalog_product_by_legacy_id("lp-bare")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bare.base_price, Decimal::ZERO);
    assert_eq!(bare.category.as_str(), "other");
    let fallback = state.repo.list_catalog_variants(bare.id).await.unwrap();
    assert_eq!(fallback.len(), 1);
    assert_eq!((fallback[0].size.as_str(), fallback[0].color.as_str()), ("ONE SIZE", "Default"));

    let store = state
        .repo
        .find_store_by_legacy_merchant("64f0c1a2b3c4d5e6")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(store.slug, "ravi-s-tees-c4d5e6");
    assert_eq!(store.owner_id, "u-ravi");

    let listing = state
        .repo
        .find_listing_by_store_and_product(store.id, table.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listing.selling_price, Decimal::from(150));
    assert_eq!(listing.status, ListingStatus::Published);
    assert!(listing.published_at.is_some());
    assert_eq!(listing.variants_summary.len(), 2);
    assert!(
        listing
            .variants_summary
            .iter()
            .all(|v| v.selling_price == Decimal::from(150))
    );
    assert_summary_fresh(&state, listing.id).await;

    // Legacy-published but without mockup media: imported as draft
    let mug = state
        .repo
        .find_catalog_product_by_legacy_id("lp-embedded")
        .await
        .unwrap()
        .unwrap();
    assert!(!mug.is_published);
    let mug_listing = state
        .repo
        .find_listing_by_store_and_product(store.id, mug.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mug_listing.status, ListingStatus::Draft);
    assert_eq!(mug_listing.selling_price, Decimal::from(120));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let state = state();
    let legacy = legacy_dataset();

    migration::run(&state, &legacy).await;
    let after_first = counts(&state).await;
    assert_eq!(
        after_first,
        Counts {
            products: 4,
            variants: 9,
            stores: 2,
            listings: 4,
            overrides: 9,
        }
    );

    let second = migration::run(&state, &legacy).await;
    assert_eq!(counts(&state).await, after_first);
    assert_eq!(second.users_promoted, 0);
    assert_eq!(second.catalog_products.created, 0);
    assert_eq!(second.catalog_products.skipped_existing, 4);
    assert_eq!(second.variants.created, 0);
    assert_eq!(second.variants.skipped_existing, 9);
    assert_eq!(second.stores.created, 0);
    assert_eq!(second.stores.skipped_existing, 2);
    assert_eq!(second.listings.created, 0);
    assert_eq!(second.listings.skipped_existing, 4);
    assert_eq!(second.overrides_written, 0);
}

#[tokio::test]
async fn test_report_serializes_for_operators() {
    let state = state();
    let report = migration::run(&state, &LegacySnapshot::default()).await;
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["catalogProducts"]["created"], 0);
    assert_eq!(value["imagesNeedingReupload"], 0);
    assert!(value["failures"].as_array().unwrap().is_empty());
}
