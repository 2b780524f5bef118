//! PostgreSQL repository (sqlx)
//!
//! Ids are snowflake i64 assigned here; timestamps are carried by callers.

mod catalog;
mod listings;
mod stores;

use sqlx::PgPool;

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
