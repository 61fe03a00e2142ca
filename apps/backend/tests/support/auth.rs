//! JWT token generation helpers for tests

use std::time::{Duration, SystemTime};

use backend::auth::jwt::mint_access_token;
use backend::state::security_config::SecurityConfig;

/// Bearer token string (without "Bearer " prefix)
pub fn mint_test_token(sub: &str, email: &str, sec: &SecurityConfig) -> String {
    mint_access_token(sub, email, Some("Test Player"), SystemTime::now(), sec)
        .expect("should mint token successfully")
}

/// Full Authorization header value including "Bearer " prefix
pub fn bearer_header(sub: &str, email: &str, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(sub, email, sec))
}

/// A token whose `exp` lies two hours in the past
pub fn mint_expired_token(sub: &str, email: &str, sec: &SecurityConfig) -> String {
    let past_time = SystemTime::now()
        .checked_sub(Duration::from_secs(7200))
        .unwrap();
    mint_access_token(sub, email, None, past_time, sec)
        .expect("should mint expired token successfully")
}
