//! Catalog products and variants

use async_trait::async_trait;
use shared::models::{CatalogProduct, CatalogVariant};
use shared::util::snowflake_id;
use sqlx::types::Json;

use super::PgRepository;
use crate::db::{CatalogRepository, RepoError, RepoResult};

const PRODUCT_COLUMNS: &str = "id, name, description, category, subcategory, attributes, \
     base_price, tax_slab, design_template, package, gallery, is_published, is_active, \
     listing_count, legacy_id, created_at, updated_at";

const VARIANT_COLUMNS: &str =
    "id, catalog_product_id, size, color, color_hex, sku_template, price_override, is_active";

#[async_trait]
impl CatalogRepository for PgRepository {
    async fn insert_catalog_product(
        &self,
        mut product: CatalogProduct,
    ) -> RepoResult<CatalogProduct> {
        product.id = snowflake_id();
        product.listing_count = 0;
        sqlx::query(
            r#"
            INSERT INTO catalog_products (
                id, name, description, category, subcategory, attributes,
                base_price, tax_slab, design_template, package, gallery,
                is_published, is_active, listing_count, legacy_id, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 0, $14, $15, $16)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category.as_str())
        .bind(&product.subcategory)
        .bind(&product.attributes)
        .bind(product.base_price)
        .bind(product.tax_slab)
        .bind(Json(&product.design_template))
        .bind(Json(&product.package))
        .bind(Json(&product.gallery))
        .bind(product.is_published)
        .bind(product.is_active)
        .bind(&product.legacy_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(product)
    }

    async fn find_catalog_product(&self, id: i64) -> RepoResult<Option<CatalogProduct>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM catalog_products WHERE id = $1");
        Ok(sqlx::query_as::<_, CatalogProduct>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_catalog_product_by_legacy_id(
        &self,
        legacy_id: &str,
    ) -> RepoResult<Option<CatalogProduct>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM catalog_products WHERE legacy_id = $1");
        Ok(sqlx::query_as::<_, CatalogProduct>(&sql)
            .bind(legacy_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_catalog_products(&self, published_only: bool) -> RepoResult<Vec<CatalogProduct>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog_products \
             WHERE NOT $1 OR (is_published AND is_active) \
             ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, CatalogProduct>(&sql)
            .bind(published_only)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn update_catalog_product(&self, product: &CatalogProduct) -> RepoResult<()> {
        let rows = sqlx::query(
            r#"
            UPDATE catalog_products SET
                name = $2, description = $3, category = $4, subcategory = $5,
                attributes = $6, base_price = $7, tax_slab = $8, design_template = $9,
                package = $10, gallery = $11, is_published = $12, is_active = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.category.as_str())
        .bind(&product.subcategory)
        .bind(&product.attributes)
        .bind(product.base_price)
        .bind(product.tax_slab)
        .bind(Json(&product.design_template))
        .bind(Json(&product.package))
        .bind(Json(&product.gallery))
        .bind(product.is_published)
        .bind(product.is_active)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(RepoError::NotFound(format!("catalog product {}", product.id)));
        }
        Ok(())
    }

    async fn delete_catalog_product(&self, id: i64) -> RepoResult<bool> {
        let rows = sqlx::query("DELETE FROM catalog_products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }

    async fn deactivate_catalog_product(&self, id: i64, now: i64) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            "UPDATE catalog_products SET is_active = FALSE, updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        sqlx::query(
            "UPDATE catalog_product_variants SET is_active = FALSE WHERE catalog_product_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(rows > 0)
    }

    async fn insert_catalog_variant(
        &self,
        mut variant: CatalogVariant,
    ) -> RepoResult<CatalogVariant> {
        variant.id = snowflake_id();
        let result = sqlx::query(
            r#"
            INSERT INTO catalog_product_variants (
                id, catalog_product_id, size, color, color_hex, sku_template,
                price_override, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(variant.id)
        .bind(variant.catalog_product_id)
        .bind(&variant.size)
        .bind(&variant.color)
        .bind(&variant.color_hex)
        .bind(&variant.sku_template)
        .bind(variant.price_override)
        .bind(variant.is_active)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(variant),
            // FK violation: parent product is gone
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => Err(
                RepoError::NotFound(format!("catalog product {}", variant.catalog_product_id)),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_catalog_variant(&self, id: i64) -> RepoResult<Option<CatalogVariant>> {
        let sql = format!("SELECT {VARIANT_COLUMNS} FROM catalog_product_variants WHERE id = $1");
        Ok(sqlx::query_as::<_, CatalogVariant>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_catalog_variants(
        &self,
        catalog_product_id: i64,
    ) -> RepoResult<Vec<CatalogVariant>> {
        let sql = format!(
            "SELECT {VARIANT_COLUMNS} FROM catalog_product_variants \
             WHERE catalog_product_id = $1 ORDER BY id"
        );
        Ok(sqlx::query_as::<_, CatalogVariant>(&sql)
            .bind(catalog_product_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn set_catalog_variant_active(&self, id: i64, is_active: bool) -> RepoResult<bool> {
        let rows = sqlx::query("UPDATE catalog_product_variants SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows > 0)
    }
}
