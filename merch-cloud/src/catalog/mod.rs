//! Tenant product catalog
//!
//! - [`service`]: global catalog writes (operator only)
//! - [`listing`]: per-store listings and variant overrides
//! - [`resolve`]: the sellable variant list of a listing
//! - [`projection`]: keeps `variants_summary` equal to the resolution

pub mod listing;
pub mod projection;
pub mod resolve;
pub mod service;
pub mod validation;

pub use projection::Synchronizer;
pub use resolve::{Resolution, resolve_listing, resolve_variants};
