//! In-memory repository
//!
//! Mirrors the Postgres unique keys and cascades so services behave the same
//! against either backend. Used with `STORAGE=memory` and in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use shared::models::{
    CatalogProduct, CatalogVariant, ResolvedVariant, Store, StoreProduct, StoreProductVariant,
};
use tokio::sync::RwLock;

use super::{
    CatalogRepository, LISTING_STORE_PRODUCT_KEY, ListingRepository, RepoError, RepoResult,
    STORE_LEGACY_MERCHANT_KEY, STORE_SLUG_KEY, StoreRepository, VARIANT_SIZE_COLOR_KEY,
    VARIANT_SKU_KEY,
};

#[derive(Default)]
struct Tables {
    products: BTreeMap<i64, CatalogProduct>,
    variants: BTreeMap<i64, CatalogVariant>,
    stores: BTreeMap<i64, Store>,
    listings: BTreeMap<i64, StoreProduct>,
    overrides: BTreeMap<i64, StoreProductVariant>,
}

pub struct MemoryRepository {
    tables: RwLock<Tables>,
    next_id: AtomicI64,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            next_id: AtomicI64::new(1),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl CatalogRepository for MemoryRepository {
    async fn insert_catalog_product(
        &self,
        mut product: CatalogProduct,
    ) -> RepoResult<CatalogProduct> {
        let mut t = self.tables.write().await;
        if let Some(legacy) = &product.legacy_id
            && t.products
                .values()
                .any(|p| p.legacy_id.as_ref() == Some(legacy))
        {
            return Err(RepoError::Duplicate("catalog_products_legacy_id_key".into()));
        }
        product.id = self.next_id();
        product.listing_count = 0;
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_catalog_product(&self, id: i64) -> RepoResult<Option<CatalogProduct>> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn find_catalog_product_by_legacy_id(
        &self,
        legacy_id: &str,
    ) -> RepoResult<Option<CatalogProduct>> {
        let t = self.tables.read().await;
        Ok(t.products
            .values()
            .find(|p| p.legacy_id.as_deref() == Some(legacy_id))
            .cloned())
    }

    async fn list_catalog_products(&self, published_only: bool) -> RepoResult<Vec<CatalogProduct>> {
        let t = self.tables.read().await;
        let mut products: Vec<CatalogProduct> = t
            .products
            .values()
            .filter(|p| !published_only || (p.is_published && p.is_active))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(products)
    }

    async fn update_catalog_product(&self, product: &CatalogProduct) -> RepoResult<()> {
        let mut t = self.tables.write().await;
        let existing = t
            .products
            .get_mut(&product.id)
            .ok_or_else(|| RepoError::NotFound(format!("catalog product {}", product.id)))?;
        let listing_count = existing.listing_count;
        *existing = product.clone();
        existing.listing_count = listing_count;
        Ok(())
    }

    async fn delete_catalog_product(&self, id: i64) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        if t.products.remove(&id).is_none() {
            return Ok(false);
        }
        t.variants.retain(|_, v| v.catalog_product_id != id);
        Ok(true)
    }

    async fn deactivate_catalog_product(&self, id: i64, now: i64) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        let Some(product) = t.products.get_mut(&id) else {
            return Ok(false);
        };
        product.is_active = false;
        product.updated_at = now;
        for variant in t.variants.values_mut() {
            if variant.catalog_product_id == id {
                variant.is_active = false;
            }
        }
        Ok(true)
    }

    async fn insert_catalog_variant(
        &self,
        mut variant: CatalogVariant,
    ) -> RepoResult<CatalogVariant> {
        let mut t = self.tables.write().await;
        if !t.products.contains_key(&variant.catalog_product_id) {
            return Err(RepoError::NotFound(format!(
                "catalog product {}",
                variant.catalog_product_id
            )));
        }
        for existing in t
            .variants
            .values()
            .filter(|v| v.catalog_product_id == variant.catalog_product_id)
        {
            if existing.size == variant.size && existing.color == variant.color {
                return Err(RepoError::Duplicate(VARIANT_SIZE_COLOR_KEY.into()));
            }
            if existing.sku_template == variant.sku_template {
                return Err(RepoError::Duplicate(VARIANT_SKU_KEY.into()));
            }
        }
        variant.id = self.next_id();
        t.variants.insert(variant.id, variant.clone());
        Ok(variant)
    }

    async fn find_catalog_variant(&self, id: i64) -> RepoResult<Option<CatalogVariant>> {
        Ok(self.tables.read().await.variants.get(&id).cloned())
    }

    async fn list_catalog_variants(
        &self,
        catalog_product_id: i64,
    ) -> RepoResult<Vec<CatalogVariant>> {
        let t = self.tables.read().await;
        Ok(t.variants
            .values()
            .filter(|v| v.catalog_product_id == catalog_product_id)
            .cloned()
            .collect())
    }

    async fn set_catalog_variant_active(&self, id: i64, is_active: bool) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        match t.variants.get_mut(&id) {
            Some(v) => {
                v.is_active = is_active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl StoreRepository for MemoryRepository {
    async fn insert_store(&self, mut store: Store) -> RepoResult<Store> {
        let mut t = self.tables.write().await;
        if t.stores.values().any(|s| s.slug == store.slug) {
            return Err(RepoError::Duplicate(STORE_SLUG_KEY.into()));
        }
        if let Some(legacy) = &store.legacy_merchant_id
            && t.stores
                .values()
                .any(|s| s.legacy_merchant_id.as_ref() == Some(legacy))
        {
            return Err(RepoError::Duplicate(STORE_LEGACY_MERCHANT_KEY.into()));
        }
        store.id = self.next_id();
        t.stores.insert(store.id, store.clone());
        Ok(store)
    }

    async fn find_store(&self, id: i64) -> RepoResult<Option<Store>> {
        Ok(self.tables.read().await.stores.get(&id).cloned())
    }

    async fn find_store_by_legacy_merchant(&self, legacy_id: &str) -> RepoResult<Option<Store>> {
        let t = self.tables.read().await;
        Ok(t.stores
            .values()
            .find(|s| s.legacy_merchant_id.as_deref() == Some(legacy_id))
            .cloned())
    }

    async fn list_store_ids_by_owner(&self, owner_id: &str) -> RepoResult<Vec<i64>> {
        let t = self.tables.read().await;
        Ok(t.stores
            .values()
            .filter(|s| s.owner_id == owner_id)
            .map(|s| s.id)
            .collect())
    }
}

#[async_trait]
impl ListingRepository for MemoryRepository {
    async fn insert_listing(&self, mut listing: StoreProduct) -> RepoResult<StoreProduct> {
        let mut t = self.tables.write().await;
        if !t.stores.contains_key(&listing.store_id) {
            return Err(RepoError::NotFound(format!("store {}", listing.store_id)));
        }
        if t.listings.values().any(|l| {
            l.store_id == listing.store_id && l.catalog_product_id == listing.catalog_product_id
        }) {
            return Err(RepoError::Duplicate(LISTING_STORE_PRODUCT_KEY.into()));
        }
        listing.id = self.next_id();
        t.listings.insert(listing.id, listing.clone());
        if let Some(product) = t.products.get_mut(&listing.catalog_product_id) {
            product.listing_count += 1;
        }
        Ok(listing)
    }

    async fn find_listing(&self, id: i64) -> RepoResult<Option<StoreProduct>> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn find_listing_by_store_and_product(
        &self,
        store_id: i64,
        catalog_product_id: i64,
    ) -> RepoResult<Option<StoreProduct>> {
        let t = self.tables.read().await;
        Ok(t.listings
            .values()
            .find(|l| l.store_id == store_id && l.catalog_product_id == catalog_product_id)
            .cloned())
    }

    async fn list_listings_by_store(&self, store_id: i64) -> RepoResult<Vec<StoreProduct>> {
        let t = self.tables.read().await;
        let mut listings: Vec<StoreProduct> = t
            .listings
            .values()
            .filter(|l| l.store_id == store_id)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(listings)
    }

    async fn list_listings_by_catalog_product(
        &self,
        catalog_product_id: i64,
    ) -> RepoResult<Vec<StoreProduct>> {
        let t = self.tables.read().await;
        Ok(t.listings
            .values()
            .filter(|l| l.catalog_product_id == catalog_product_id)
            .cloned()
            .collect())
    }

    async fn update_listing(&self, listing: &StoreProduct) -> RepoResult<()> {
        let mut t = self.tables.write().await;
        let existing = t
            .listings
            .get_mut(&listing.id)
            .ok_or_else(|| RepoError::NotFound(format!("listing {}", listing.id)))?;
        let summary = std::mem::take(&mut existing.variants_summary);
        *existing = listing.clone();
        existing.variants_summary = summary;
        Ok(())
    }

    async fn delete_listing(&self, id: i64) -> RepoResult<bool> {
        let mut t = self.tables.write().await;
        let Some(listing) = t.listings.remove(&id) else {
            return Ok(false);
        };
        t.overrides.retain(|_, o| o.store_product_id != id);
        if let Some(product) = t.products.get_mut(&listing.catalog_product_id) {
            product.listing_count = (product.listing_count - 1).max(0);
        }
        Ok(true)
    }

    async fn upsert_variant_override(
        &self,
        mut row: StoreProductVariant,
    ) -> RepoResult<StoreProductVariant> {
        let mut t = self.tables.write().await;
        if !t.listings.contains_key(&row.store_product_id) {
            return Err(RepoError::NotFound(format!("listing {}", row.store_product_id)));
        }
        let existing = t.overrides.values_mut().find(|o| {
            o.store_product_id == row.store_product_id
                && o.catalog_product_variant_id == row.catalog_product_variant_id
        });
        if let Some(existing) = existing {
            existing.sku = row.sku;
            existing.selling_price = row.selling_price;
            existing.is_active = row.is_active;
            return Ok(existing.clone());
        }
        row.id = self.next_id();
        t.overrides.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_variant_overrides(
        &self,
        store_product_id: i64,
    ) -> RepoResult<Vec<StoreProductVariant>> {
        let t = self.tables.read().await;
        Ok(t.overrides
            .values()
            .filter(|o| o.store_product_id == store_product_id)
            .cloned()
            .collect())
    }

    async fn write_variants_summary(
        &self,
        store_product_id: i64,
        summary: &[ResolvedVariant],
    ) -> RepoResult<()> {
        let mut t = self.tables.write().await;
        let listing = t
            .listings
            .get_mut(&store_product_id)
            .ok_or_else(|| RepoError::NotFound(format!("listing {store_product_id}")))?;
        listing.variants_summary = summary.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::models::{ListingStatus, PackageDimensions, ProductCategory};

    fn product() -> CatalogProduct {
        CatalogProduct {
            id: 0,
            name: "Tee".into(),
            description: String::new(),
            category: ProductCategory::Apparel,
            subcategory: "t_shirts".into(),
            attributes: serde_json::json!({}),
            base_price: Decimal::from(100),
            tax_slab: 5,
            design_template: vec![],
            package: PackageDimensions::default(),
            gallery: vec![],
            is_published: true,
            is_active: true,
            listing_count: 0,
            legacy_id: None,
            created_at: 1,
            updated_at: 1,
        }
    }

    fn variant(product_id: i64, size: &str, color: &str, sku: &str) -> CatalogVariant {
        CatalogVariant {
            id: 0,
            catalog_product_id: product_id,
            size: size.into(),
            color: color.into(),
            color_hex: None,
            sku_template: sku.into(),
            price_override: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_variant_unique_keys() {
        let repo = MemoryRepository::new();
        let p = repo.insert_catalog_product(product()).await.unwrap();
        repo.insert_catalog_variant(variant(p.id, "M", "Red", "A"))
            .await
            .unwrap();

        let err = repo
            .insert_catalog_variant(variant(p.id, "M", "Red", "B"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_of(VARIANT_SIZE_COLOR_KEY));

        let err = repo
            .insert_catalog_variant(variant(p.id, "L", "Red", "A"))
            .await
            .unwrap_err();
        assert!(err.is_duplicate_of(VARIANT_SKU_KEY));
    }

    #[tokio::test]
    async fn test_listing_count_tracks_insert_and_delete() {
        let repo = MemoryRepository::new();
        let p = repo.insert_catalog_product(product()).await.unwrap();
        let store = repo
            .insert_store(Store {
                id: 0,
                slug: "s".into(),
                name: "S".into(),
                owner_id: "u1".into(),
                is_active: true,
                legacy_merchant_id: None,
                created_at: 1,
            })
            .await
            .unwrap();
        let listing = repo
            .insert_listing(StoreProduct {
                id: 0,
                store_id: store.id,
                catalog_product_id: p.id,
                selling_price: Decimal::from(250),
                compare_at_price: None,
                title: None,
                description: None,
                gallery: vec![],
                design_data: serde_json::json!({}),
                status: ListingStatus::Draft,
                published_at: None,
                variants_summary: vec![],
                created_at: 1,
                updated_at: 1,
            })
            .await
            .unwrap();
        let count = async |repo: &MemoryRepository| {
            let id = p.id;
            repo.find_catalog_product(id)
                .await
                .unwrap()
                .unwrap()
                .listing_count
        };
        assert_eq!(count(&repo).await, 1);
        assert!(repo.delete_listing(listing.id).await.unwrap());
        assert_eq!(count(&repo).await, 0);
    }
}
