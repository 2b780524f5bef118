//! Legacy single-table product model
//!
//! Read through [`LegacySource`]: Postgres in production, an in-memory
//! [`LegacySnapshot`] in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::db::RepoResult;

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct LegacyMerchant {
    pub id: String,
    pub name: String,
    pub owner_user_id: String,
    pub is_active: bool,
}

/// One legacy product row; catalog fields live in the nested `catalogue` blob
#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct LegacyProduct {
    pub id: String,
    pub merchant_id: Option<String>,
    pub name: String,
    pub is_published: bool,
    pub catalogue: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, sqlx::FromRow)]
pub struct LegacyVariantRow {
    pub id: String,
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct LegacyUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[async_trait]
pub trait LegacySource: Send + Sync {
    /// Rewrite legacy `admin` roles to `superadmin`; returns how many changed
    async fn promote_admin_users(&self) -> RepoResult<u64>;
    async fn merchants(&self) -> RepoResult<Vec<LegacyMerchant>>;
    async fn products(&self) -> RepoResult<Vec<LegacyProduct>>;
    /// Rows of the legacy variant table for one product
    async fn variant_rows(&self, product_id: &str) -> RepoResult<Vec<LegacyVariantRow>>;
}

pub struct PgLegacySource {
    pool: PgPool,
}

impl PgLegacySource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LegacySource for PgLegacySource {
    async fn promote_admin_users(&self) -> RepoResult<u64> {
        let rows = sqlx::query("UPDATE users SET role = 'superadmin' WHERE role = 'admin'")
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows)
    }

    async fn merchants(&self) -> RepoResult<Vec<LegacyMerchant>> {
        Ok(sqlx::query_as::<_, LegacyMerchant>(
            "SELECT id, name, owner_user_id, is_active FROM legacy_merchants ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn products(&self) -> RepoResult<Vec<LegacyProduct>> {
        Ok(sqlx::query_as::<_, LegacyProduct>(
            "SELECT id, merchant_id, name, is_published, catalogue FROM legacy_products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn variant_rows(&self, product_id: &str) -> RepoResult<Vec<LegacyVariantRow>> {
        Ok(sqlx::query_as::<_, LegacyVariantRow>(
            r#"
            SELECT id, product_id, size, color, color_hex, sku, price
            FROM legacy_product_variants
            WHERE product_id = $1
            ORDER BY id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// In-memory legacy dataset
#[derive(Default)]
pub struct LegacySnapshot {
    pub users: Mutex<Vec<LegacyUser>>,
    pub merchants: Vec<LegacyMerchant>,
    pub products: Vec<LegacyProduct>,
    pub variant_rows: Vec<LegacyVariantRow>,
}

#[async_trait]
impl LegacySource for LegacySnapshot {
    async fn promote_admin_users(&self) -> RepoResult<u64> {
        let mut users = self.users.lock().await;
        let mut promoted = 0;
        for user in users.iter_mut().filter(|u| u.role == "admin") {
            user.role = "superadmin".into();
            promoted += 1;
        }
        Ok(promoted)
    }

    async fn merchants(&self) -> RepoResult<Vec<LegacyMerchant>> {
        Ok(self.merchants.clone())
    }

    async fn products(&self) -> RepoResult<Vec<LegacyProduct>> {
        Ok(self.products.clone())
    }

    async fn variant_rows(&self, product_id: &str) -> RepoResult<Vec<LegacyVariantRow>> {
        Ok(self
            .variant_rows
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }
}
