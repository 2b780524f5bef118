//! Listings and per-variant overrides

use async_trait::async_trait;
use shared::models::{ResolvedVariant, StoreProduct, StoreProductVariant};
use shared::util::snowflake_id;
use sqlx::types::Json;

use super::PgRepository;
use crate::db::{ListingRepository, RepoError, RepoResult};

const LISTING_COLUMNS: &str = "id, store_id, catalog_product_id, selling_price, \
     compare_at_price, title, description, gallery, design_data, status, published_at, \
     variants_summary, created_at, updated_at";

const OVERRIDE_COLUMNS: &str =
    "id, store_product_id, catalog_product_variant_id, sku, selling_price, is_active";

#[async_trait]
impl ListingRepository for PgRepository {
    async fn insert_listing(&self, mut listing: StoreProduct) -> RepoResult<StoreProduct> {
        listing.id = snowflake_id();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO store_products (
                id, store_id, catalog_product_id, selling_price, compare_at_price,
                title, description, gallery, design_data, status, published_at,
                variants_summary, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(listing.id)
        .bind(listing.store_id)
        .bind(listing.catalog_product_id)
        .bind(listing.selling_price)
        .bind(listing.compare_at_price)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(Json(&listing.gallery))
        .bind(&listing.design_data)
        .bind(listing.status.as_str())
        .bind(listing.published_at)
        .bind(Json(&listing.variants_summary))
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE catalog_products SET listing_count = listing_count + 1 WHERE id = $1")
            .bind(listing.catalog_product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(listing)
    }

    async fn find_listing(&self, id: i64) -> RepoResult<Option<StoreProduct>> {
        let sql = format!("SELECT {LISTING_COLUMNS} FROM store_products WHERE id = $1");
        Ok(sqlx::query_as::<_, StoreProduct>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_listing_by_store_and_product(
        &self,
        store_id: i64,
        catalog_product_id: i64,
    ) -> RepoResult<Option<StoreProduct>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM store_products \
             WHERE store_id = $1 AND catalog_product_id = $2"
        );
        Ok(sqlx::query_as::<_, StoreProduct>(&sql)
            .bind(store_id)
            .bind(catalog_product_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_listings_by_store(&self, store_id: i64) -> RepoResult<Vec<StoreProduct>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM store_products \
             WHERE store_id = $1 ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, StoreProduct>(&sql)
            .bind(store_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_listings_by_catalog_product(
        &self,
        catalog_product_id: i64,
    ) -> RepoResult<Vec<StoreProduct>> {
        let sql = format!(
            "SELECT {LISTING_COLUMNS} FROM store_products WHERE catalog_product_id = $1 ORDER BY id"
        );
        Ok(sqlx::query_as::<_, StoreProduct>(&sql)
            .bind(catalog_product_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_listing(&self, listing: &StoreProduct) -> RepoResult<()> {
        let rows = sqlx::query(
            r#"
            UPDATE store_products SET
                selling_price = $2, compare_at_price = $3, title = $4, description = $5,
                gallery = $6, design_data = $7, status = $8, published_at = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(listing.id)
        .bind(listing.selling_price)
        .bind(listing.compare_at_price)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(Json(&listing.gallery))
        .bind(&listing.design_data)
        .bind(listing.status.as_str())
        .bind(listing.published_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(RepoError::NotFound(format!("listing {}", listing.id)));
        }
        Ok(())
    }

    async fn delete_listing(&self, id: i64) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;

        // Overrides cascade via FK
        let row: Option<(i64,)> =
            sqlx::query_as("DELETE FROM store_products WHERE id = $1 RETURNING catalog_product_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((catalog_product_id,)) = row else {
            tx.commit().await?;
            return Ok(false);
        };

        sqlx::query(
            "UPDATE catalog_products SET listing_count = GREATEST(listing_count - 1, 0) WHERE id = $1",
        )
        .bind(catalog_product_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn upsert_variant_override(
        &self,
        row: StoreProductVariant,
    ) -> RepoResult<StoreProductVariant> {
        let sql = format!(
            r#"
            INSERT INTO store_product_variants (
                id, store_product_id, catalog_product_variant_id, sku, selling_price, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (store_product_id, catalog_product_variant_id)
            DO UPDATE SET
                sku = EXCLUDED.sku,
                selling_price = EXCLUDED.selling_price,
                is_active = EXCLUDED.is_active
            RETURNING {OVERRIDE_COLUMNS}
            "#
        );
        let result = sqlx::query_as::<_, StoreProductVariant>(&sql)
            .bind(snowflake_id())
            .bind(row.store_product_id)
            .bind(row.catalog_product_variant_id)
            .bind(&row.sku)
            .bind(row.selling_price)
            .bind(row.is_active)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(saved) => Ok(saved),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => Err(
                RepoError::NotFound(format!("listing {}", row.store_product_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_variant_overrides(
        &self,
        store_product_id: i64,
    ) -> RepoResult<Vec<StoreProductVariant>> {
        let sql = format!(
            "SELECT {OVERRIDE_COLUMNS} FROM store_product_variants \
             WHERE store_product_id = $1 ORDER BY id"
        );
        Ok(sqlx::query_as::<_, StoreProductVariant>(&sql)
            .bind(store_product_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn write_variants_summary(
        &self,
        store_product_id: i64,
        summary: &[ResolvedVariant],
    ) -> RepoResult<()> {
        let rows = sqlx::query("UPDATE store_products SET variants_summary = $2 WHERE id = $1")
            .bind(store_product_id)
            .bind(Json(summary))
            .execute(&self.pool)
            .await?
            .rows_affected();
        if rows == 0 {
            return Err(RepoError::NotFound(format!("listing {store_product_id}")));
        }
        Ok(())
    }
}
