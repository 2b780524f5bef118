//! Unified error codes for the merch platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Store errors
//! - 4xxx: Catalog errors
//! - 5xxx: Listing errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Platform operator role required
    AdminRequired = 2003,
    /// Store is not owned by the caller
    StoreNotOwned = 2010,

    // ==================== 3xxx: Store ====================
    /// Store not found
    StoreNotFound = 3002,
    /// Store is deactivated
    StoreInactive = 3003,
    /// Store slug already taken
    StoreSlugExists = 3004,

    // ==================== 4xxx: Catalog ====================
    /// Catalog product not found
    CatalogProductNotFound = 4001,
    /// Catalog product is not published
    CatalogProductNotPublished = 4002,
    /// Catalog product is deactivated
    CatalogProductInactive = 4003,
    /// Catalog product is referenced by a published listing
    CatalogProductInUse = 4004,
    /// Catalog variant not found
    CatalogVariantNotFound = 4101,
    /// Duplicate size/color pair on a catalog product
    VariantConflict = 4102,
    /// Duplicate SKU on a catalog product
    SkuConflict = 4103,
    /// Category or subcategory outside the closed enumeration
    InvalidCategory = 4201,
    /// No design view carries mockup media
    MockupRequired = 4202,
    /// Gallery must flag exactly one primary image
    PrimaryImageRequired = 4203,
    /// Price is negative or malformed
    InvalidPrice = 4204,

    // ==================== 5xxx: Listing ====================
    /// Listing not found
    ListingNotFound = 5001,
    /// Store already lists this catalog product
    ListingConflict = 5002,
    /// Listing is not published
    ListingNotPublished = 5003,
    /// Catalog variant does not belong to the listing's catalog product
    VariantNotInCatalogProduct = 5101,
    /// Listing references a deleted catalog product or variant
    DanglingReference = 5201,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
    /// Migration step failed
    MigrationFailed = 9501,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Platform operator role is required",
            ErrorCode::StoreNotOwned => "Store is not owned by the caller",

            // Store
            ErrorCode::StoreNotFound => "Store not found",
            ErrorCode::StoreInactive => "Store is deactivated",
            ErrorCode::StoreSlugExists => "Store slug already exists",

            // Catalog
            ErrorCode::CatalogProductNotFound => "Catalog product not found",
            ErrorCode::CatalogProductNotPublished => "Catalog product is not published",
            ErrorCode::CatalogProductInactive => "Catalog product is deactivated",
            ErrorCode::CatalogProductInUse => {
                "Catalog product is referenced by a published listing"
            }
            ErrorCode::CatalogVariantNotFound => "Catalog variant not found",
            ErrorCode::VariantConflict => "Variant with this size and color already exists",
            ErrorCode::SkuConflict => "Variant with this SKU already exists",
            ErrorCode::InvalidCategory => "Unknown category or subcategory",
            ErrorCode::MockupRequired => "At least one design view needs mockup media",
            ErrorCode::PrimaryImageRequired => "Exactly one gallery image must be primary",
            ErrorCode::InvalidPrice => "Price is invalid",

            // Listing
            ErrorCode::ListingNotFound => "Listing not found",
            ErrorCode::ListingConflict => "Store already lists this catalog product",
            ErrorCode::ListingNotPublished => "Listing is not published",
            ErrorCode::VariantNotInCatalogProduct => {
                "Variant does not belong to the listed catalog product"
            }
            ErrorCode::DanglingReference => "Listing references a deleted catalog entity",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::MigrationFailed => "Migration step failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2010 => Ok(ErrorCode::StoreNotOwned),

            // Store
            3002 => Ok(ErrorCode::StoreNotFound),
            3003 => Ok(ErrorCode::StoreInactive),
            3004 => Ok(ErrorCode::StoreSlugExists),

            // Catalog
            4001 => Ok(ErrorCode::CatalogProductNotFound),
            4002 => Ok(ErrorCode::CatalogProductNotPublished),
            4003 => Ok(ErrorCode::CatalogProductInactive),
            4004 => Ok(ErrorCode::CatalogProductInUse),
            4101 => Ok(ErrorCode::CatalogVariantNotFound),
            4102 => Ok(ErrorCode::VariantConflict),
            4103 => Ok(ErrorCode::SkuConflict),
            4201 => Ok(ErrorCode::InvalidCategory),
            4202 => Ok(ErrorCode::MockupRequired),
            4203 => Ok(ErrorCode::PrimaryImageRequired),
            4204 => Ok(ErrorCode::InvalidPrice),

            // Listing
            5001 => Ok(ErrorCode::ListingNotFound),
            5002 => Ok(ErrorCode::ListingConflict),
            5003 => Ok(ErrorCode::ListingNotPublished),
            5101 => Ok(ErrorCode::VariantNotInCatalogProduct),
            5201 => Ok(ErrorCode::DanglingReference),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9501 => Ok(ErrorCode::MigrationFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
