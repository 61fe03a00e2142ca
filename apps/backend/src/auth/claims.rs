//! Claims carried by identity-provider access tokens.

use serde::{Deserialize, Serialize};

/// Verified token claims, inserted into request extensions by `JwtExtract`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BackendClaims {
    /// External identity (players.sub)
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}
