//! Machine-checkable error kinds exposed in the API envelope
//!
//! Codes are fine-grained and may grow; kinds are the stable taxonomy
//! clients branch on.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing input
    ValidationError,
    /// Referenced entity is absent
    NotFound,
    /// Unique-index violation
    Conflict,
    /// Authentication or ownership check failed
    Unauthorized,
    /// Listing points at a deleted catalog entity
    DanglingReference,
    /// Infrastructure failure
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::DanglingReference => "dangling_reference",
            Self::Internal => "internal",
        }
    }
}

impl ErrorCode {
    /// Stable error kind for this code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound
            | Self::StoreNotFound
            | Self::CatalogProductNotFound
            | Self::CatalogVariantNotFound
            | Self::ListingNotFound => ErrorKind::NotFound,

            Self::AlreadyExists
            | Self::StoreSlugExists
            | Self::CatalogProductInUse
            | Self::VariantConflict
            | Self::SkuConflict
            | Self::ListingConflict => ErrorKind::Conflict,

            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::PermissionDenied
            | Self::AdminRequired
            | Self::StoreNotOwned => ErrorKind::Unauthorized,

            Self::DanglingReference => ErrorKind::DanglingReference,

            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::TimeoutError
            | Self::ConfigError
            | Self::MigrationFailed => ErrorKind::Internal,

            _ => ErrorKind::ValidationError,
        }
    }
}
