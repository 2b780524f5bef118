//! Domain models
//!
//! Catalog, store and listing entities plus their request payloads.

pub mod catalog;
pub mod listing;
pub mod role;
pub mod store;

pub use catalog::*;
pub use listing::*;
pub use role::Role;
pub use store::Store;
