//! The authenticated player, provisioned locally on first sight.

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use time::OffsetDateTime;

use crate::auth::claims::BackendClaims;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::services::players::{self, IdentityClaims};
use crate::state::app_state::AppState;

/// Referral code a first-time player arrived with, forwarded by the client.
pub const REFERRAL_HEADER: &str = "x-referral-code";

/// Resolved from the claims `JwtExtract` stored in request extensions.
///
/// Missing claims mean the route is not behind `JwtExtract`, which is
/// reported as 401 rather than trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentPlayer {
    pub id: i64,
    pub sub: String,
    pub display_name: Option<String>,
    pub wallet_address: Option<String>,
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<BackendClaims>()
                .cloned()
                .ok_or_else(AppError::unauthorized)?;
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::config("AppState not registered"))?;

            let identity = IdentityClaims {
                sub: claims.sub,
                display_name: claims.name,
                email: Some(claims.email),
            };
            let referral_code = req
                .headers()
                .get(REFERRAL_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let now = OffsetDateTime::now_utc();
            let player = with_txn(Some(&req), &state, move |txn| {
                Box::pin(async move {
                    players::ensure_player_with_referral(
                        txn,
                        identity,
                        referral_code.as_deref(),
                        now,
                    )
                    .await
                })
            })
            .await?;

            Ok(CurrentPlayer {
                id: player.id,
                sub: player.sub,
                display_name: player.display_name,
                wallet_address: player.wallet_address,
            })
        })
    }
}
