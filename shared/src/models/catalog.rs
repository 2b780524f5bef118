//! Catalog Model
//!
//! Platform-owned product definitions and their size × color variant axis.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed category enumeration for catalog products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Apparel,
    Accessories,
    HomeLiving,
    Stationery,
    Other,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 5] = [
        Self::Apparel,
        Self::Accessories,
        Self::HomeLiving,
        Self::Stationery,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apparel => "apparel",
            Self::Accessories => "accessories",
            Self::HomeLiving => "home_living",
            Self::Stationery => "stationery",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Subcategories allowed under this category
    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            Self::Apparel => &[
                "t_shirts",
                "hoodies",
                "sweatshirts",
                "tank_tops",
                "polos",
                "kids",
                "other",
            ],
            Self::Accessories => &[
                "caps",
                "tote_bags",
                "phone_cases",
                "socks",
                "masks",
                "other",
            ],
            Self::HomeLiving => &["mugs", "posters", "cushions", "canvas", "bottles", "other"],
            Self::Stationery => &["notebooks", "stickers", "calendars", "cards", "other"],
            Self::Other => &["other"],
        }
    }

    pub fn allows_subcategory(&self, subcategory: &str) -> bool {
        self.subcategories().contains(&subcategory)
    }
}

impl TryFrom<String> for ProductCategory {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown product category: {value}"))
    }
}

/// Rectangular print area on a design view, in view-relative units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintArea {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Named design view (front, back, sleeve ...) with its mockup media
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignView {
    pub name: String,
    #[serde(default)]
    pub mockup_url: String,
    #[serde(default)]
    pub placeholders: Vec<PrintArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Shipping package dimensions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackageDimensions {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_g: f64,
}

/// Catalog product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub category: ProductCategory,
    pub subcategory: String,
    /// Free-form attribute map
    pub attributes: serde_json::Value,
    /// Production price every variant inherits unless overridden
    pub base_price: Decimal,
    /// Tax slab in percent
    pub tax_slab: i32,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub design_template: Vec<DesignView>,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub package: PackageDimensions,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub gallery: Vec<GalleryImage>,
    pub is_published: bool,
    pub is_active: bool,
    /// Number of listings referencing this product (atomic counter)
    pub listing_count: i64,
    /// Source product id when created by the legacy migration
    pub legacy_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CatalogProduct {
    pub fn has_mockup(&self) -> bool {
        has_mockup(&self.design_template)
    }

    pub fn primary_image_count(&self) -> usize {
        self.gallery.iter().filter(|g| g.is_primary).count()
    }
}

/// True when at least one design view carries non-empty mockup media
pub fn has_mockup(views: &[DesignView]) -> bool {
    views.iter().any(|v| !v.mockup_url.trim().is_empty())
}

/// Create catalog product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: String,
    pub attributes: Option<serde_json::Value>,
    pub base_price: Decimal,
    pub tax_slab: Option<i32>,
    #[serde(default)]
    pub design_template: Vec<DesignView>,
    pub package: Option<PackageDimensions>,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
    pub is_published: Option<bool>,
    #[serde(default)]
    pub variants: Vec<CatalogVariantCreate>,
}

/// Update catalog product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub attributes: Option<serde_json::Value>,
    pub base_price: Option<Decimal>,
    pub tax_slab: Option<i32>,
    pub design_template: Option<Vec<DesignView>>,
    pub package: Option<PackageDimensions>,
    pub gallery: Option<Vec<GalleryImage>>,
}

/// Catalog variant entity (one size × color cell)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariant {
    pub id: i64,
    pub catalog_product_id: i64,
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    pub sku_template: String,
    /// Production cost for this variant; `None` inherits the product base price
    pub price_override: Option<Decimal>,
    pub is_active: bool,
}

impl CatalogVariant {
    pub fn production_cost(&self, base_price: Decimal) -> Decimal {
        self.price_override.unwrap_or(base_price)
    }
}

/// Create catalog variant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariantCreate {
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    /// Synthesized as `PREFIX-SIZE-COLOR` when absent
    pub sku: Option<String>,
    pub price_override: Option<Decimal>,
}

/// Why a variant in a bulk insert was not created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantConflictReason {
    DuplicateSizeColor,
    DuplicateSku,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantConflict {
    pub size: String,
    pub color: String,
    pub sku: String,
    pub reason: VariantConflictReason,
}

/// Partial-success outcome of a bulk variant insert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkVariantResult {
    pub created: Vec<CatalogVariant>,
    pub conflicts: Vec<VariantConflict>,
}

/// Client-facing variant view (`skuTemplate` exposed as `sku`, effective cost as `price`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogVariantView {
    pub id: i64,
    pub size: String,
    pub color: String,
    pub color_hex: Option<String>,
    pub sku: String,
    pub price: Decimal,
}

impl CatalogVariantView {
    pub fn from_variant(variant: &CatalogVariant, base_price: Decimal) -> Self {
        Self {
            id: variant.id,
            size: variant.size.clone(),
            color: variant.color.clone(),
            color_hex: variant.color_hex.clone(),
            sku: variant.sku_template.clone(),
            price: variant.production_cost(base_price),
        }
    }
}

/// Catalog product with its active variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProductDetail {
    #[serde(flatten)]
    pub product: CatalogProduct,
    pub variants: Vec<CatalogVariantView>,
    /// Variants from the create payload that collided and were skipped
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<VariantConflict>,
}

/// How a catalog product delete treats referencing listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Reject while a published listing references the product, else hard delete
    #[default]
    Strict,
    /// Soft-deactivate product and variants, leave listings in place
    Deactivate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!(ProductCategory::parse("Apparel"), Some(ProductCategory::Apparel));
        assert_eq!(
            ProductCategory::parse("home-living"),
            Some(ProductCategory::HomeLiving)
        );
        assert_eq!(ProductCategory::parse("furniture"), None);
        assert!(ProductCategory::Apparel.allows_subcategory("hoodies"));
        assert!(!ProductCategory::Apparel.allows_subcategory("mugs"));
    }

    #[test]
    fn test_variant_production_cost_inherits_base() {
        let mut variant = CatalogVariant {
            id: 1,
            catalog_product_id: 1,
            size: "M".into(),
            color: "Red".into(),
            color_hex: None,
            sku_template: "TEE-M-RED".into(),
            price_override: None,
            is_active: true,
        };
        assert_eq!(variant.production_cost(Decimal::from(100)), Decimal::from(100));
        variant.price_override = Some(Decimal::from(110));
        assert_eq!(variant.production_cost(Decimal::from(100)), Decimal::from(110));
    }

    #[test]
    fn test_has_mockup_ignores_blank_urls() {
        let views = vec![DesignView {
            name: "front".into(),
            mockup_url: "  ".into(),
            placeholders: vec![],
        }];
        assert!(!has_mockup(&views));
    }
}
