//! Shared types for the merch platform
//!
//! Error codes and envelopes, domain models, and small utilities used by
//! the cloud service and the migration binary.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
