//! Variant resolution through the listing write paths

mod common;

use common::*;
use merch_cloud::catalog::{listing, resolve_listing, service};
use shared::models::{CatalogProductUpdate, DeletePolicy, ListingPatch, VariantOverrideInput};

#[tokio::test]
async fn test_fallback_then_override_mode() {
    let state = state();
    let store = seed_store(&state, "m1", "tee-shop", true).await;
    let product = seed_product(
        &state,
        "Classic Tee",
        100,
        vec![variant("M", "Red", None), variant("L", "Red", Some(110))],
    )
    .await;
    let principal = merchant("m1", &[store.id]);

    let created = listing::upsert_listing(&state, &principal, listing_input(store.id, product.product.id, 250))
        .await
        .unwrap();

    // No overrides: every active variant at the flat listing price
    let summary = &created.variants_summary;
    assert_eq!(summary.len(), 2);
    assert_eq!((summary[0].size.as_str(), summary[0].selling_price), ("L", dec(250)));
    assert_eq!(summary[0].production_cost, dec(110));
    assert_eq!((summary[1].size.as_str(), summary[1].selling_price), ("M", dec(250)));
    assert_eq!(summary[1].production_cost, dec(100));
    assert_summary_fresh(&state, created.id).await;

    let medium = product.variants.iter().find(|v| v.size == "M").unwrap();
    listing::upsert_variant_override(
        &state,
        &principal,
        created.id,
        VariantOverrideInput {
            catalog_variant_id: medium.id,
            sku: None,
            selling_price: Some(dec(230)),
            is_active: None,
        },
    )
    .await
    .unwrap();

    // One override present: only overridden variants are sold
    let stored = assert_summary_fresh(&state, created.id).await;
    assert_eq!(stored.variants_summary.len(), 1);
    assert_eq!(stored.variants_summary[0].catalog_variant_id, medium.id);
    assert_eq!(stored.variants_summary[0].selling_price, dec(230));
    assert_eq!(stored.variants_summary[0].sku, medium.sku);
}

#[tokio::test]
async fn test_override_without_price_inherits_listing_price() {
    let state = state();
    let store = seed_store(&state, "m1", "shop", true).await;
    let product = seed_product(&state, "Tee", 100, vec![variant("S", "Blue", None)]).await;
    let principal = merchant("m1", &[store.id]);
    let mut input = listing_input(store.id, product.product.id, 300);
    input.variants = Some(vec![VariantOverrideInput {
        catalog_variant_id: product.variants[0].id,
        sku: Some("MY-SKU".into()),
        selling_price: None,
        is_active: Some(true),
    }]);

    let created = listing::upsert_listing(&state, &principal, input).await.unwrap();
    assert_eq!(created.variants_summary.len(), 1);
    assert_eq!(created.variants_summary[0].selling_price, dec(300));
    assert_eq!(created.variants_summary[0].sku, "MY-SKU");

    // Listing price change flows into inherited override prices
    let patched = listing::update_listing(
        &state,
        &principal,
        created.id,
        ListingPatch {
            selling_price: Some(dec(320)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(patched.variants_summary[0].selling_price, dec(320));
    assert_summary_fresh(&state, created.id).await;
}

#[tokio::test]
async fn test_design_data_selection_narrows_fallback() {
    let state = state();
    let store = seed_store(&state, "m1", "shop", true).await;
    let product = seed_product(
        &state,
        "Tee",
        100,
        vec![
            variant("M", "Red", None),
            variant("M", "Black", None),
            variant("L", "Black", None),
        ],
    )
    .await;
    let mut input = listing_input(store.id, product.product.id, 200);
    input.design_data = Some(serde_json::json!({"selectedColors": ["black"], "selectedSizes": ["M"]}));

    let created = listing::upsert_listing(&state, &merchant("m1", &[store.id]), input)
        .await
        .unwrap();
    assert_eq!(created.variants_summary.len(), 1);
    assert_eq!(created.variants_summary[0].color, "Black");
    assert_eq!(created.variants_summary[0].size, "M");
}

#[tokio::test]
async fn test_deactivated_variant_leaves_summary() {
    let state = state();
    let store = seed_store(&state, "m1", "shop", true).await;
    let product = seed_product(
        &state,
        "Tee",
        100,
        vec![variant("M", "Red", None), variant("L", "Red", None)],
    )
    .await;
    let principal = merchant("m1", &[store.id]);
    let created = listing::upsert_listing(&state, &principal, listing_input(store.id, product.product.id, 250))
        .await
        .unwrap();
    assert_eq!(created.variants_summary.len(), 2);

    let large = product.variants.iter().find(|v| v.size == "L").unwrap();
    service::deactivate_variant(&state, large.id).await.unwrap();

    let stored = assert_summary_fresh(&state, created.id).await;
    assert_eq!(stored.variants_summary.len(), 1);
    assert_eq!(stored.variants_summary[0].size, "M");
}

#[tokio::test]
async fn test_base_price_edit_resyncs_production_cost() {
    let state = state();
    let store = seed_store(&state, "m1", "shop", true).await;
    let product = seed_product(&state, "Mug", 80, vec![variant("11oz", "White", None)]).await;
    let created = listing::upsert_listing(
        &state,
        &merchant("m1", &[store.id]),
        listing_input(store.id, product.product.id, 199),
    )
    .await
    .unwrap();
    assert_eq!(created.variants_summary[0].production_cost, dec(80));

    service::update_catalog_product(
        &state,
        product.product.id,
        CatalogProductUpdate {
            base_price: Some(dec(90)),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let stored = assert_summary_fresh(&state, created.id).await;
    assert_eq!(stored.variants_summary[0].production_cost, dec(90));
    assert_eq!(stored.variants_summary[0].selling_price, dec(199));
}

#[tokio::test]
async fn test_hard_deleted_product_resolves_empty_and_dangling() {
    let state = state();
    let store = seed_store(&state, "m1", "shop", true).await;
    let product = seed_product(&state, "Cap", 50, vec![variant("OS", "Black", None)]).await;
    let created = listing::upsert_listing(
        &state,
        &merchant("m1", &[store.id]),
        listing_input(store.id, product.product.id, 120),
    )
    .await
    .unwrap();

    // Draft listings do not block a strict delete
    service::delete_catalog_product(&state, product.product.id, DeletePolicy::Strict)
        .await
        .unwrap();

    let listing = state.repo.find_listing(created.id).await.unwrap().unwrap();
    assert!(listing.variants_summary.is_empty());
    let resolution = resolve_listing(state.repo.as_ref(), &listing).await.unwrap();
    assert!(resolution.dangling);
    assert!(resolution.variants.is_empty());
}
