use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::rfc3339;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::domain::GameKind;
use crate::error::AppError;
use crate::extractors::{CurrentPlayer, ValidatedJson};
use crate::services::players::{self, PlayerProfile};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct BestScoreResponse {
    pub game_kind: GameKind,
    pub best_score: u64,
    pub achieved_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub display_name: Option<String>,
    pub wallet_address: Option<String>,
    pub referral_code: String,
    pub invited_by: Option<i64>,
    pub balance: u64,
    pub total_earned: u64,
    pub games_played: u64,
    pub daily_streak: u32,
    pub last_played_at: Option<String>,
    pub best_scores: Vec<BestScoreResponse>,
}

impl From<PlayerProfile> for ProfileResponse {
    fn from(p: PlayerProfile) -> Self {
        Self {
            id: p.player.id,
            display_name: p.player.display_name,
            wallet_address: p.player.wallet_address,
            referral_code: p.player.referral_code,
            invited_by: p.player.invited_by,
            balance: p.aggregate.balance,
            total_earned: p.aggregate.total_earned,
            games_played: p.aggregate.games_played,
            daily_streak: p.aggregate.daily_streak,
            last_played_at: p.aggregate.last_played_at.map(rfc3339),
            best_scores: p
                .best_scores
                .into_iter()
                .map(|b| BestScoreResponse {
                    game_kind: b.game_kind,
                    best_score: b.best_score,
                    achieved_at: rfc3339(b.achieved_at),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LinkWalletRequest {
    pub wallet_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletResponse {
    pub wallet_address: String,
}

async fn me(
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let profile = players::profile(db, player.id).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

async fn link_wallet(
    http_req: HttpRequest,
    player: CurrentPlayer,
    body: ValidatedJson<LinkWalletRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let address = body.into_inner().wallet_address;
    let player_id = player.id;
    let now = OffsetDateTime::now_utc();

    let updated = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { players::link_wallet(txn, player_id, &address, now).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(WalletResponse {
        wallet_address: updated.wallet_address.unwrap_or_default(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me))
        .route("/me/wallet", web::put().to(link_wallet));
}
