//! Persistence seam
//!
//! The service and the migration engine both write through [`Repository`].
//! Two implementations: [`postgres::PgRepository`] (sqlx) and
//! [`memory::MemoryRepository`] (development and tests).

pub mod memory;
pub mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;
use shared::models::{
    CatalogProduct, CatalogVariant, ResolvedVariant, Store, StoreProduct, StoreProductVariant,
};
use thiserror::Error;

/// Unique key of `(catalog_product_id, size, color)`
pub const VARIANT_SIZE_COLOR_KEY: &str = "uq_catalog_variant_size_color";
/// Unique key of `(catalog_product_id, sku_template)`
pub const VARIANT_SKU_KEY: &str = "uq_catalog_variant_sku";
/// Unique key of `(store_id, catalog_product_id)`
pub const LISTING_STORE_PRODUCT_KEY: &str = "uq_listing_store_product";
pub const STORE_SLUG_KEY: &str = "uq_store_slug";
pub const STORE_LEGACY_MERCHANT_KEY: &str = "uq_store_legacy_merchant";

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique violation; carries the constraint name
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl RepoError {
    /// Whether this is a unique violation on the given constraint
    pub fn is_duplicate_of(&self, key: &str) -> bool {
        matches!(self, RepoError::Duplicate(k) if k == key)
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.code().as_deref() == Some("23505")
        {
            return RepoError::Duplicate(db.constraint().unwrap_or("unique").to_string());
        }
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row".into()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Global catalog: products and their size × color variants
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert a product; the repository assigns `id`
    async fn insert_catalog_product(&self, product: CatalogProduct) -> RepoResult<CatalogProduct>;
    async fn find_catalog_product(&self, id: i64) -> RepoResult<Option<CatalogProduct>>;
    async fn find_catalog_product_by_legacy_id(
        &self,
        legacy_id: &str,
    ) -> RepoResult<Option<CatalogProduct>>;
    /// `published_only` keeps products that are both published and active
    async fn list_catalog_products(&self, published_only: bool) -> RepoResult<Vec<CatalogProduct>>;
    /// Write every editable column; `listing_count` is left alone
    async fn update_catalog_product(&self, product: &CatalogProduct) -> RepoResult<()>;
    /// Hard delete, cascading to variants
    async fn delete_catalog_product(&self, id: i64) -> RepoResult<bool>;
    /// Soft-deactivate the product and all of its variants
    async fn deactivate_catalog_product(&self, id: i64, now: i64) -> RepoResult<bool>;

    /// Insert a variant; `Duplicate` names the colliding unique key
    async fn insert_catalog_variant(&self, variant: CatalogVariant) -> RepoResult<CatalogVariant>;
    async fn find_catalog_variant(&self, id: i64) -> RepoResult<Option<CatalogVariant>>;
    /// All variants of a product, inactive included
    async fn list_catalog_variants(&self, catalog_product_id: i64)
    -> RepoResult<Vec<CatalogVariant>>;
    async fn set_catalog_variant_active(&self, id: i64, is_active: bool) -> RepoResult<bool>;
}

/// Merchant-owned stores
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn insert_store(&self, store: Store) -> RepoResult<Store>;
    async fn find_store(&self, id: i64) -> RepoResult<Option<Store>>;
    async fn find_store_by_legacy_merchant(&self, legacy_id: &str) -> RepoResult<Option<Store>>;
    async fn list_store_ids_by_owner(&self, owner_id: &str) -> RepoResult<Vec<i64>>;
}

/// Tenant listings and their per-variant overrides
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Insert a listing and bump the catalog product's `listing_count` atomically
    async fn insert_listing(&self, listing: StoreProduct) -> RepoResult<StoreProduct>;
    async fn find_listing(&self, id: i64) -> RepoResult<Option<StoreProduct>>;
    async fn find_listing_by_store_and_product(
        &self,
        store_id: i64,
        catalog_product_id: i64,
    ) -> RepoResult<Option<StoreProduct>>;
    async fn list_listings_by_store(&self, store_id: i64) -> RepoResult<Vec<StoreProduct>>;
    async fn list_listings_by_catalog_product(
        &self,
        catalog_product_id: i64,
    ) -> RepoResult<Vec<StoreProduct>>;
    /// Write editable columns; `variants_summary` is owned by the synchronizer
    async fn update_listing(&self, listing: &StoreProduct) -> RepoResult<()>;
    /// Delete the listing with its overrides and decrement `listing_count`
    async fn delete_listing(&self, id: i64) -> RepoResult<bool>;

    /// Insert or update in place on `(store_product_id, catalog_product_variant_id)`
    async fn upsert_variant_override(
        &self,
        row: StoreProductVariant,
    ) -> RepoResult<StoreProductVariant>;
    async fn list_variant_overrides(
        &self,
        store_product_id: i64,
    ) -> RepoResult<Vec<StoreProductVariant>>;
    /// Replace the whole cached summary in one statement
    async fn write_variants_summary(
        &self,
        store_product_id: i64,
        summary: &[ResolvedVariant],
    ) -> RepoResult<()>;
}

/// The full persistence seam
pub trait Repository: CatalogRepository + StoreRepository + ListingRepository {}

impl<T> Repository for T where T: CatalogRepository + StoreRepository + ListingRepository {}
