//! Listing Model
//!
//! A store's listing of one catalog product, its per-variant overrides and
//! the denormalized `variants_summary` projection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Listing publish status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Draft,
    Published,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl TryFrom<String> for ListingStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(format!("unknown listing status: {other}")),
        }
    }
}

/// One sellable variant as resolved for a listing
///
/// Also the element type of the cached `variants_summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVariant {
    pub catalog_variant_id: i64,
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    pub sku: String,
    pub selling_price: Decimal,
    pub production_cost: Decimal,
}

/// Listing entity (StoreProduct)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StoreProduct {
    pub id: i64,
    pub store_id: i64,
    pub catalog_product_id: i64,
    pub selling_price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub gallery: Vec<String>,
    /// Opaque blob owned by the design editor
    pub design_data: serde_json::Value,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub status: ListingStatus,
    pub published_at: Option<i64>,
    /// Rebuildable cache of the resolved variants
    #[cfg_attr(feature = "db", sqlx(json))]
    pub variants_summary: Vec<ResolvedVariant>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-variant override of a listing (StoreProductVariant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StoreProductVariant {
    pub id: i64,
    pub store_product_id: i64,
    pub catalog_product_variant_id: i64,
    /// Tenant SKU; empty falls back to the catalog SKU template
    pub sku: String,
    pub selling_price: Option<Decimal>,
    pub is_active: bool,
}

/// Override payload for one catalog variant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantOverrideInput {
    pub catalog_variant_id: i64,
    pub sku: Option<String>,
    pub selling_price: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Create-or-update listing payload (`POST /store-products`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpsert {
    /// Present: update this listing. Absent: create.
    pub id: Option<i64>,
    pub store_id: i64,
    pub catalog_product_id: i64,
    pub selling_price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub design_data: Option<serde_json::Value>,
    pub variants: Option<Vec<VariantOverrideInput>>,
}

/// Partial listing update (`PATCH /store-products/{id}`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    pub selling_price: Option<Decimal>,
    pub compare_at_price: Option<Decimal>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub gallery: Option<Vec<String>>,
    pub design_data: Option<serde_json::Value>,
    pub status: Option<ListingStatus>,
    pub variants: Option<Vec<VariantOverrideInput>>,
}

impl ListingPatch {
    /// Whether this patch can change the resolved variant set
    pub fn affects_resolution(&self) -> bool {
        self.selling_price.is_some()
            || self.status.is_some()
            || self.variants.is_some()
            || self.design_data.is_some()
    }
}

/// Storefront view of a published listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicListing {
    pub id: i64,
    pub store_id: i64,
    pub catalog_product_id: i64,
    pub title: String,
    pub description: String,
    pub selling_price: Decimal,
    pub compare_at_price: Option<Decimal>,
    pub gallery: Vec<String>,
    pub variants: Vec<ResolvedVariant>,
}
