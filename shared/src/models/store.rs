//! Store Model (merchant-owned tenant)

use serde::{Deserialize, Serialize};

/// Store entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    /// Unique subdomain slug
    pub slug: String,
    pub name: String,
    /// Owning user id (JWT subject)
    pub owner_id: String,
    pub is_active: bool,
    /// Source merchant id when created by the legacy migration
    pub legacy_merchant_id: Option<String>,
    pub created_at: i64,
}
