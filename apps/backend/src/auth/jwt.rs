use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use super::claims::BackendClaims;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::security_config::SecurityConfig;

/// Mint a token the way the identity provider does. Used by tests and local tooling.
pub fn mint_access_token(
    sub: &str,
    email: &str,
    name: Option<&str>,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal(ErrorCode::Internal, "clock is before the epoch"))?
        .as_secs();
    let exp = iat.saturating_add(security.token_ttl.as_secs());

    let claims = BackendClaims {
        sub: sub.to_string(),
        email: email.to_string(),
        name: name.map(str::to_string),
        exp: i64::try_from(exp).unwrap_or(i64::MAX),
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(ErrorCode::Internal, format!("failed to encode JWT: {e}")))
}

/// Verify signature, algorithm and expiry, returning the claims.
///
/// Expired tokens map to `UNAUTHORIZED_EXPIRED_JWT`; every other failure to
/// `UNAUTHORIZED_INVALID_JWT`.
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<BackendClaims, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = security.leeway_secs;

    decode::<BackendClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!(reason = ?e.kind(), "JWT rejected");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
            _ => AppError::unauthorized_invalid_jwt(),
        }
    })
}
