//! Input validation helpers
//!
//! Every check here runs before any write. Errors carry the offending field in
//! `details.field`.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CatalogVariantCreate, DesignView, GalleryImage, ProductCategory, VariantOverrideInput,
    catalog::has_mockup,
};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: catalog product, store, listing title
pub const MAX_NAME_LEN: usize = 200;

/// Product and listing descriptions
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Variant axis values: size, color
pub const MAX_AXIS_LEN: usize = 50;

pub const MAX_SKU_LEN: usize = 64;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Allowed tax slabs, in percent
pub const TAX_SLABS: [i32; 5] = [0, 5, 12, 18, 28];

/// Slab applied when a create payload omits one
pub const DEFAULT_TAX_SLAB: i32 = 18;

/// Money columns are `NUMERIC(12,2)`
pub const MAX_PRICE_SCALE: u32 = 2;

/// Largest value a `NUMERIC(12,2)` column holds
pub const MAX_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

// ── Generic helpers ─────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::invalid_field(
            field,
            format!(
                "{field} is too long ({} chars, max {max_len})",
                value.chars().count()
            ),
        ));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::invalid_field(
            field,
            format!("{field} is too long ({} chars, max {max_len})", v.chars().count()),
        ));
    }
    Ok(())
}

/// Money: non-negative, at most [`MAX_PRICE`], whole cents
pub fn validate_price(value: Decimal, field: &str) -> Result<(), AppError> {
    let message = if value < Decimal::ZERO {
        format!("{field} must be >= 0")
    } else if value > MAX_PRICE {
        format!("{field} must be <= {MAX_PRICE}")
    } else if value.normalize().scale() > MAX_PRICE_SCALE {
        format!("{field} must have at most {MAX_PRICE_SCALE} decimal places")
    } else {
        return Ok(());
    };
    Err(AppError::with_message(ErrorCode::InvalidPrice, message).with_detail("field", field))
}

pub fn validate_urls(urls: &[String], field: &str) -> Result<(), AppError> {
    for url in urls {
        if url.len() > MAX_URL_LEN {
            return Err(AppError::invalid_field(
                field,
                format!("{field} entry exceeds {MAX_URL_LEN} bytes"),
            ));
        }
    }
    Ok(())
}

// ── Catalog ─────────────────────────────────────────────────────────

/// Parse a category and check the subcategory belongs to it
pub fn validate_category(category: &str, subcategory: &str) -> Result<ProductCategory, AppError> {
    let parsed = ProductCategory::parse(category).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidCategory,
            format!("Unknown category: {category}"),
        )
        .with_detail("field", "category")
    })?;
    if !parsed.allows_subcategory(subcategory) {
        return Err(AppError::with_message(
            ErrorCode::InvalidCategory,
            format!("Subcategory {subcategory} is not allowed under {}", parsed.as_str()),
        )
        .with_detail("field", "subcategory"));
    }
    Ok(parsed)
}

pub fn validate_tax_slab(slab: i32) -> Result<(), AppError> {
    if !TAX_SLABS.contains(&slab) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("taxSlab must be one of {TAX_SLABS:?}"),
        )
        .with_detail("field", "taxSlab"));
    }
    Ok(())
}

/// Publishing requires mockup media and exactly one primary gallery image
pub fn validate_publishable(
    design_template: &[DesignView],
    gallery: &[GalleryImage],
) -> Result<(), AppError> {
    if !has_mockup(design_template) {
        return Err(AppError::new(ErrorCode::MockupRequired).with_detail("field", "designTemplate"));
    }
    let primaries = gallery.iter().filter(|g| g.is_primary).count();
    if primaries != 1 {
        return Err(AppError::new(ErrorCode::PrimaryImageRequired)
            .with_detail("field", "gallery")
            .with_detail("primaryCount", primaries));
    }
    Ok(())
}

pub fn validate_design_template(views: &[DesignView]) -> Result<(), AppError> {
    for view in views {
        validate_required_text(&view.name, "designTemplate.name", MAX_NAME_LEN)?;
        if view.mockup_url.len() > MAX_URL_LEN {
            return Err(AppError::invalid_field(
                "designTemplate.mockupUrl",
                format!("mockupUrl exceeds {MAX_URL_LEN} bytes"),
            ));
        }
        for area in &view.placeholders {
            if area.width <= 0.0 || area.height <= 0.0 {
                return Err(AppError::invalid_field(
                    "designTemplate.placeholders",
                    format!("print area {} must have a positive size", area.name),
                ));
            }
        }
    }
    Ok(())
}

/// `#RRGGBB`
pub fn validate_color_hex(hex: &Option<String>) -> Result<(), AppError> {
    if let Some(hex) = hex {
        let ok = hex.len() == 7
            && hex.starts_with('#')
            && hex[1..].chars().all(|c| c.is_ascii_hexdigit());
        if !ok {
            return Err(AppError::invalid_field(
                "colorHex",
                format!("colorHex must look like #RRGGBB, got {hex}"),
            ));
        }
    }
    Ok(())
}

pub fn validate_variant(input: &CatalogVariantCreate) -> Result<(), AppError> {
    validate_required_text(&input.size, "size", MAX_AXIS_LEN)?;
    validate_required_text(&input.color, "color", MAX_AXIS_LEN)?;
    validate_color_hex(&input.color_hex)?;
    validate_optional_text(&input.sku, "sku", MAX_SKU_LEN)?;
    if let Some(price) = input.price_override {
        validate_price(price, "priceOverride")?;
    }
    Ok(())
}

// ── Listings ────────────────────────────────────────────────────────

/// `compare_at_price`, when set, must not undercut `selling_price`
pub fn validate_listing_prices(
    selling_price: Decimal,
    compare_at_price: Option<Decimal>,
) -> Result<(), AppError> {
    validate_price(selling_price, "sellingPrice")?;
    if let Some(compare) = compare_at_price {
        validate_price(compare, "compareAtPrice")?;
    }
    if let Some(compare) = compare_at_price
        && compare < selling_price
    {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            "compareAtPrice must be >= sellingPrice",
        )
        .with_detail("field", "compareAtPrice"));
    }
    Ok(())
}

pub fn validate_override(input: &VariantOverrideInput) -> Result<(), AppError> {
    validate_optional_text(&input.sku, "variants.sku", MAX_SKU_LEN)?;
    if let Some(price) = input.selling_price {
        validate_price(price, "variants.sellingPrice")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorKind;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Tee", "name", MAX_NAME_LEN).is_ok());
        let err = validate_required_text("  ", "name", MAX_NAME_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_price_must_be_non_negative() {
        assert!(validate_price(Decimal::ZERO, "basePrice").is_ok());
        let err = validate_price(Decimal::new(-1, 2), "basePrice").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_price_fits_numeric_column() {
        assert_eq!(MAX_PRICE.to_string(), "9999999999.99");
        assert!(validate_price(MAX_PRICE, "sellingPrice").is_ok());
        assert!(validate_price(Decimal::new(1999, 2), "sellingPrice").is_ok());
        // Trailing zeros do not count as precision
        assert!(validate_price(Decimal::new(10500, 3), "sellingPrice").is_ok());

        let err = validate_price(Decimal::new(1_000_000_000_000, 2), "sellingPrice").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
        let err = validate_price(Decimal::new(12345, 3), "sellingPrice").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_category_and_subcategory() {
        assert_eq!(
            validate_category("apparel", "hoodies").unwrap(),
            ProductCategory::Apparel
        );
        assert_eq!(
            validate_category("weapons", "x").unwrap_err().code,
            ErrorCode::InvalidCategory
        );
        assert!(validate_category("apparel", "mugs").is_err());
    }

    #[test]
    fn test_tax_slab() {
        for slab in TAX_SLABS {
            assert!(validate_tax_slab(slab).is_ok());
        }
        assert!(validate_tax_slab(7).is_err());
    }

    #[test]
    fn test_publishable_needs_mockup_and_single_primary() {
        let view = DesignView {
            name: "front".into(),
            mockup_url: "https://cdn/front.png".into(),
            placeholders: vec![],
        };
        let img = |primary| GalleryImage {
            url: "https://cdn/a.png".into(),
            is_primary: primary,
        };

        assert!(validate_publishable(std::slice::from_ref(&view), &[img(true), img(false)]).is_ok());
        assert_eq!(
            validate_publishable(&[], &[img(true)]).unwrap_err().code,
            ErrorCode::MockupRequired
        );
        assert_eq!(
            validate_publishable(std::slice::from_ref(&view), &[img(true), img(true)])
                .unwrap_err()
                .code,
            ErrorCode::PrimaryImageRequired
        );
        assert!(validate_publishable(&[view], &[]).is_err());
    }

    #[test]
    fn test_color_hex() {
        assert!(validate_color_hex(&Some("#1a2B3c".into())).is_ok());
        assert!(validate_color_hex(&None).is_ok());
        assert!(validate_color_hex(&Some("red".into())).is_err());
    }

    #[test]
    fn test_listing_prices() {
        assert!(validate_listing_prices(Decimal::from(250), None).is_ok());
        assert!(validate_listing_prices(Decimal::from(250), Some(Decimal::from(300))).is_ok());
        let err =
            validate_listing_prices(Decimal::from(250), Some(Decimal::from(200))).unwrap_err();
        assert_eq!(err.details.unwrap()["field"], "compareAtPrice");
    }
}
