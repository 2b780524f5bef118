//! Bearer authentication for the management API

pub mod tenant_auth;

pub use tenant_auth::{Claims, Principal, create_token, tenant_auth_middleware, verify_token};
