//! Stores

use async_trait::async_trait;
use shared::models::Store;
use shared::util::snowflake_id;

use super::PgRepository;
use crate::db::{RepoResult, StoreRepository};

const STORE_COLUMNS: &str = "id, slug, name, owner_id, is_active, legacy_merchant_id, created_at";

#[async_trait]
impl StoreRepository for PgRepository {
    async fn insert_store(&self, mut store: Store) -> RepoResult<Store> {
        store.id = snowflake_id();
        sqlx::query(
            r#"
            INSERT INTO stores (id, slug, name, owner_id, is_active, legacy_merchant_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(store.id)
        .bind(&store.slug)
        .bind(&store.name)
        .bind(&store.owner_id)
        .bind(store.is_active)
        .bind(&store.legacy_merchant_id)
        .bind(store.created_at)
        .execute(&self.pool)
        .await?;
        Ok(store)
    }

    async fn find_store(&self, id: i64) -> RepoResult<Option<Store>> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_store_by_legacy_merchant(&self, legacy_id: &str) -> RepoResult<Option<Store>> {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE legacy_merchant_id = $1");
        Ok(sqlx::query_as::<_, Store>(&sql)
            .bind(legacy_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_store_ids_by_owner(&self, owner_id: &str) -> RepoResult<Vec<i64>> {
        let rows: Vec<(i64,)> = sqlx::query_as("SELECT id FROM stores WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
