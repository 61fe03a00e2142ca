#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::{mint_access_token, verify_access_token, BackendClaims};
pub use config::db::{db_url, DbKind, DbOwner, RuntimeEnv};
pub use config::rewards::RewardsConfig;
pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::{CurrentPlayer, ValidatedJson};
pub use infra::state::build_state;
pub use middleware::{JwtExtract, RequestTrace, StructuredLogger, TraceSpan};
pub use services::ledger::{LedgerService, SubmitOutcome, SubmitScore};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
