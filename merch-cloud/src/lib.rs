//! merch-cloud: print-on-demand catalog and tenant listing service
//!
//! Operators curate a global catalog of blank products; merchants list them
//! in their stores with their own prices. The sellable variants of a listing
//! are resolved from catalog defaults and store overrides, then cached on the
//! listing as `variants_summary` for storefront reads.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod migration;
pub mod state;

pub use config::Config;
pub use state::AppState;
