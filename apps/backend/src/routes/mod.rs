use actix_web::web;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::JwtExtract;

pub mod health;
pub mod leaderboard;
pub mod players;
pub mod scores;
pub mod stats;

/// Register every route. `/api/scores`, `/api/players` and `/api/leaderboard/me`
/// sit behind `JwtExtract`.
///
/// Shared by `main.rs` and the HTTP tests, so both exercise the same
/// authentication wiring. Request-level middleware (trace, span, logger)
/// is wrapped by the caller.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(query_config());

    cfg.service(web::scope("/health").configure(health::configure_routes));

    cfg.service(
        web::scope("/api/scores")
            .wrap(JwtExtract)
            .configure(scores::configure_routes),
    );
    cfg.service(
        web::scope("/api/players")
            .wrap(JwtExtract)
            .configure(players::configure_routes),
    );
    cfg.service(web::scope("/api/leaderboard").configure(leaderboard::configure_routes));
    cfg.service(web::scope("/api/stats").configure(stats::configure_routes));
}

/// Malformed query strings become `400 BAD_REQUEST` problems.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query string: {err}")).into()
    })
}

pub(crate) fn rfc3339(at: OffsetDateTime) -> String {
    at.format(&Rfc3339).unwrap_or_else(|_| at.unix_timestamp().to_string())
}
