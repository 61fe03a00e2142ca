//! Bearer-token verification for identity-provider tokens.

pub mod claims;
pub mod jwt;

pub use claims::BackendClaims;
pub use jwt::{mint_access_token, verify_access_token};
