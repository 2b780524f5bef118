//! Role Model

use serde::{Deserialize, Serialize};

/// Platform role carried by an authenticated principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator: owns the catalog, may act on any store
    Superadmin,
    /// Store owner: may only write listings of owned stores
    Merchant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Merchant => "merchant",
        }
    }
}
