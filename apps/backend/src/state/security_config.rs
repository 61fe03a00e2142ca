use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Bearer-token verification settings shared with the identity provider.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
    /// Lifetime of tokens minted by this service (tests and tooling)
    pub token_ttl: Duration,
    /// Clock skew tolerated when checking `exp`
    pub leeway_secs: u64,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: Duration::from_secs(15 * 60),
            leeway_secs: 0,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::new(b"insecure_default_secret_for_tests".to_vec())
    }
}
