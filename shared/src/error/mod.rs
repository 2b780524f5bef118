//! Unified error system for the merch platform
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`ErrorKind`]: Stable taxonomy clients branch on
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified `success`/`code`/`kind` response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Store errors
//! - 4xxx: Catalog errors
//! - 5xxx: Listing errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::new(ErrorCode::ListingNotFound);
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "sellingPrice");
//! let response = ApiResponse::<()>::error(&err);
//! assert!(!response.success);
//! ```

mod category;
mod codes;
mod http;
mod kind;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use kind::ErrorKind;
pub use types::{
    ApiResponse, AppError, AppResult, debug_details_enabled, set_debug_details,
};
