//! Legacy record → catalog/listing shapes
//!
//! Pure functions; the engine owns all I/O.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use shared::models::{
    CatalogProduct, CatalogVariantCreate, DesignView, GalleryImage, PackageDimensions, PrintArea,
    ProductCategory,
};
use shared::util::{sku_prefix, sku_token, slugify, synthesize_sku};

use super::legacy::{LegacyProduct, LegacyVariantRow};
use crate::catalog::validation::{
    DEFAULT_TAX_SLAB, TAX_SLABS, validate_color_hex, validate_publishable,
};

pub const FALLBACK_SIZE: &str = "ONE SIZE";
pub const FALLBACK_COLOR: &str = "Default";

/// Nested `catalogue` blob of a legacy product.
///
/// Every field is optional; legacy writers used both camelCase and snake_case.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyCatalogue {
    pub description: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "sub_category", alias = "subCategory")]
    pub subcategory: Option<String>,
    #[serde(alias = "base_price", alias = "price")]
    pub base_price: Option<Decimal>,
    #[serde(alias = "tax_slab", alias = "gst")]
    pub tax_slab: Option<i32>,
    pub attributes: Option<Value>,
    #[serde(alias = "design_views", alias = "designTemplate")]
    pub design_views: Vec<LegacyDesignView>,
    #[serde(alias = "images")]
    pub gallery: Vec<LegacyImage>,
    pub variants: Vec<LegacyEmbeddedVariant>,
    #[serde(alias = "available_sizes", alias = "sizes")]
    pub available_sizes: Vec<String>,
    #[serde(alias = "available_colors", alias = "colors")]
    pub available_colors: Vec<LegacyColor>,
    #[serde(alias = "package_dimensions", alias = "dimensions")]
    pub package: Option<PackageDimensions>,
}

impl LegacyCatalogue {
    pub fn parse(value: &Value) -> Result<Self, serde_json::Error> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyDesignView {
    pub name: String,
    #[serde(alias = "mockup", alias = "mockup_url", alias = "image")]
    pub mockup_url: String,
    /// Kept raw; malformed print areas are dropped one by one
    pub placeholders: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyImage {
    Url(String),
    Entry {
        url: String,
        #[serde(default, alias = "isPrimary", alias = "is_primary")]
        primary: bool,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegacyEmbeddedVariant {
    pub size: String,
    pub color: String,
    #[serde(alias = "color_hex", alias = "hex")]
    pub color_hex: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyColor {
    Name(String),
    Swatch {
        name: String,
        #[serde(default, alias = "colorHex", alias = "color_hex")]
        hex: Option<String>,
    },
}

impl LegacyColor {
    fn parts(&self) -> (&str, Option<&str>) {
        match self {
            Self::Name(name) => (name, None),
            Self::Swatch { name, hex } => (name, hex.as_deref()),
        }
    }
}

/// Built catalog product plus what the transform had to paper over
#[derive(Debug)]
pub struct ProductDraft {
    pub product: CatalogProduct,
    pub images_stripped: usize,
    pub notes: Vec<String>,
}

/// Which legacy shape the variants came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantSource {
    Table,
    Embedded,
    Matrix,
    Fallback,
}

pub fn is_inline_image(url: &str) -> bool {
    url.trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Blank out an inline image, bumping `stripped`
fn strip_inline(url: &str, stripped: &mut usize) -> String {
    if is_inline_image(url) {
        *stripped += 1;
        String::new()
    } else {
        url.trim().to_string()
    }
}

/// Map a legacy category pair onto the closed enumeration.
///
/// Returns `false` when anything had to be replaced by `other`.
pub fn map_category(
    category: Option<&str>,
    subcategory: Option<&str>,
) -> (ProductCategory, String, bool) {
    let Some(category) = category.and_then(ProductCategory::parse) else {
        return (ProductCategory::Other, "other".into(), false);
    };
    let subcategory = subcategory
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_");
    if category.allows_subcategory(&subcategory) {
        (category, subcategory, true)
    } else {
        (category, "other".into(), false)
    }
}

/// Keep exactly one primary image among non-blank entries
fn normalize_primary(gallery: &mut [GalleryImage]) {
    let mut seen = false;
    for image in gallery.iter_mut() {
        if image.url.is_empty() || seen {
            image.is_primary = false;
        } else if image.is_primary {
            seen = true;
        }
    }
    if !seen && let Some(first) = gallery.iter_mut().find(|g| !g.url.is_empty()) {
        first.is_primary = true;
    }
}

pub fn catalog_product_from_legacy(
    legacy: &LegacyProduct,
    catalogue: &LegacyCatalogue,
    now: i64,
) -> ProductDraft {
    let mut notes = Vec::new();
    let mut images_stripped = 0;

    let name = match legacy.name.trim() {
        "" => {
            notes.push("blank name replaced by legacy id".to_string());
            legacy.id.clone()
        }
        name => name.to_string(),
    };

    let (category, subcategory, exact) =
        map_category(catalogue.category.as_deref(), catalogue.subcategory.as_deref());
    if !exact {
        notes.push(format!(
            "category {:?}/{:?} mapped to {}/{}",
            catalogue.category.as_deref().unwrap_or_default(),
            catalogue.subcategory.as_deref().unwrap_or_default(),
            category.as_str(),
            subcategory
        ));
    }

    let base_price = match catalogue.base_price {
        Some(price) if price < Decimal::ZERO => {
            notes.push(format!("negative base price {price} clamped to 0"));
            Decimal::ZERO
        }
        Some(price) => price.round_dp(2),
        None => {
            notes.push("missing base price set to 0".to_string());
            Decimal::ZERO
        }
    };

    let tax_slab = match catalogue.tax_slab {
        Some(slab) if TAX_SLABS.contains(&slab) => slab,
        Some(slab) => {
            notes.push(format!("tax slab {slab} replaced by {DEFAULT_TAX_SLAB}"));
            DEFAULT_TAX_SLAB
        }
        None => DEFAULT_TAX_SLAB,
    };

    let design_template: Vec<DesignView> = catalogue
        .design_views
        .iter()
        .enumerate()
        .map(|(i, view)| DesignView {
            name: match view.name.trim() {
                "" => format!("view-{}", i + 1),
                name => name.to_string(),
            },
            mockup_url: strip_inline(&view.mockup_url, &mut images_stripped),
            placeholders: view
                .placeholders
                .iter()
                .filter_map(|raw| serde_json::from_value::<PrintArea>(raw.clone()).ok())
                .filter(|area| area.width > 0.0 && area.height > 0.0)
                .collect(),
        })
        .collect();

    let mut gallery: Vec<GalleryImage> = catalogue
        .gallery
        .iter()
        .map(|image| {
            let (url, primary) = match image {
                LegacyImage::Url(url) => (url.as_str(), false),
                LegacyImage::Entry { url, primary } => (url.as_str(), *primary),
            };
            GalleryImage {
                url: strip_inline(url, &mut images_stripped),
                is_primary: primary,
            }
        })
        .collect();
    normalize_primary(&mut gallery);

    let is_published = if legacy.is_published {
        match validate_publishable(&design_template, &gallery) {
            Ok(()) => true,
            Err(e) => {
                notes.push(format!("imported unpublished: {}", e.message));
                false
            }
        }
    } else {
        false
    };

    ProductDraft {
        product: CatalogProduct {
            id: 0,
            name,
            description: catalogue.description.clone().unwrap_or_default(),
            category,
            subcategory,
            attributes: catalogue
                .attributes
                .clone()
                .unwrap_or_else(|| serde_json::json!({})),
            base_price,
            tax_slab,
            design_template,
            package: catalogue.package.clone().unwrap_or_default(),
            gallery,
            is_published,
            is_active: true,
            listing_count: 0,
            legacy_id: Some(legacy.id.clone()),
            created_at: now,
            updated_at: now,
        },
        images_stripped,
        notes,
    }
}

fn axis(value: &str, fallback: &str) -> String {
    match value.trim() {
        "" => fallback.to_string(),
        v => v.to_string(),
    }
}

/// One variant input; SKU is always filled in so it carries the legacy id suffix
fn variant_input(
    prefix: &str,
    base_price: Decimal,
    size: &str,
    color: &str,
    color_hex: Option<&str>,
    sku: Option<&str>,
    price: Option<Decimal>,
) -> CatalogVariantCreate {
    let size = axis(size, FALLBACK_SIZE);
    let color = axis(color, FALLBACK_COLOR);
    let color_hex = color_hex
        .map(|h| h.trim().to_string())
        .filter(|h| validate_color_hex(&Some(h.clone())).is_ok());
    let sku = match sku.map(str::trim) {
        Some(sku) if !sku.is_empty() => sku.to_string(),
        _ => synthesize_sku(prefix, &size, &color),
    };
    // Only a real deviation from the base price becomes an override
    let price_override = price
        .map(|p| p.round_dp(2))
        .filter(|p| *p >= Decimal::ZERO && *p != base_price);
    CatalogVariantCreate {
        size,
        color,
        color_hex,
        sku: Some(sku),
        price_override,
    }
}

/// Variants for a migrated product: table rows, then the embedded array,
/// then sizes × colors, then a single `ONE SIZE / Default`.
pub fn variant_inputs(
    legacy: &LegacyProduct,
    catalogue: &LegacyCatalogue,
    rows: &[LegacyVariantRow],
    base_price: Decimal,
) -> (Vec<CatalogVariantCreate>, VariantSource) {
    let prefix = sku_prefix(&legacy.name, &legacy.id);

    if !rows.is_empty() {
        let inputs = rows
            .iter()
            .map(|r| {
                variant_input(
                    &prefix,
                    base_price,
                    &r.size,
                    &r.color,
                    r.color_hex.as_deref(),
                    r.sku.as_deref(),
                    r.price,
                )
            })
            .collect();
        return (inputs, VariantSource::Table);
    }

    if !catalogue.variants.is_empty() {
        let inputs = catalogue
            .variants
            .iter()
            .map(|v| {
                variant_input(
                    &prefix,
                    base_price,
                    &v.size,
                    &v.color,
                    v.color_hex.as_deref(),
                    v.sku.as_deref(),
                    v.price,
                )
            })
            .collect();
        return (inputs, VariantSource::Embedded);
    }

    let sizes: Vec<&str> = catalogue
        .available_sizes
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let colors: Vec<(&str, Option<&str>)> = catalogue
        .available_colors
        .iter()
        .map(LegacyColor::parts)
        .filter(|(name, _)| !name.trim().is_empty())
        .collect();

    if sizes.is_empty() && colors.is_empty() {
        let input = variant_input(
            &prefix,
            base_price,
            FALLBACK_SIZE,
            FALLBACK_COLOR,
            None,
            None,
            None,
        );
        return (vec![input], VariantSource::Fallback);
    }

    let sizes = if sizes.is_empty() { vec![FALLBACK_SIZE] } else { sizes };
    let colors = if colors.is_empty() {
        vec![(FALLBACK_COLOR, None)]
    } else {
        colors
    };
    let inputs = sizes
        .iter()
        .flat_map(|size| {
            colors.iter().map(|(color, hex)| {
                variant_input(&prefix, base_price, size, color, *hex, None, None)
            })
        })
        .collect::<Vec<_>>();
    (inputs, VariantSource::Matrix)
}

/// Store slug: slugified name + `-` + last six characters of the legacy id
pub fn store_slug(name: &str, legacy_id: &str) -> String {
    let base = match slugify(name) {
        s if s.is_empty() => "store".to_string(),
        s => s,
    };
    let id = sku_token(legacy_id).to_ascii_lowercase();
    let suffix = &id[id.len().saturating_sub(6)..];
    if suffix.is_empty() {
        base
    } else {
        format!("{base}-{suffix}")
    }
}

/// Default listing price: 50% markup over the base price
pub fn listing_price(base_price: Decimal) -> Decimal {
    (base_price * Decimal::new(15, 1)).round_dp(2)
}
