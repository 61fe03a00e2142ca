use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use super::rfc3339;
use crate::db::require_db;
use crate::domain::GameKind;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::extractors::CurrentPlayer;
use crate::middleware::JwtExtract;
use crate::services::leaderboard::{self, LeaderboardRow, PlayerStanding};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub game_kind: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardRowResponse {
    pub rank: u32,
    pub player_id: i64,
    pub display_name: Option<String>,
    pub best_score: u64,
    pub achieved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_earned: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_streak: Option<u32>,
}

impl From<&LeaderboardRow> for LeaderboardRowResponse {
    fn from(row: &LeaderboardRow) -> Self {
        Self {
            rank: row.rank,
            player_id: row.player_id,
            display_name: row.display_name.clone(),
            best_score: row.best_score,
            achieved_at: row.achieved_at.map(rfc3339),
            total_earned: row.total_earned,
            daily_streak: row.daily_streak,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub game_kind: Option<GameKind>,
    pub entries: Vec<LeaderboardRowResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingResponse {
    pub player_id: i64,
    pub display_name: Option<String>,
    pub rank: Option<u64>,
    pub best_score: u64,
    pub total_earned: u64,
    pub daily_streak: u32,
}

impl StandingResponse {
    fn new(player: CurrentPlayer, standing: PlayerStanding) -> Self {
        Self {
            player_id: player.id,
            display_name: player.display_name,
            rank: standing.rank,
            best_score: standing.best_score,
            total_earned: standing.total_earned,
            daily_streak: standing.daily_streak,
        }
    }
}

async fn top(
    query: web::Query<LeaderboardQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_kind = match query.game_kind.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<GameKind>().map_err(|_| {
            DomainError::validation(
                ValidationKind::UnknownGameKind,
                format!("unknown game kind '{raw}'"),
            )
        })?),
    };
    let limit = leaderboard::resolve_limit(query.limit)?;

    let rows = leaderboard::top(&app_state, game_kind, limit).await?;
    Ok(HttpResponse::Ok().json(LeaderboardResponse {
        game_kind,
        entries: rows.iter().map(LeaderboardRowResponse::from).collect(),
    }))
}

async fn me(
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let standing = leaderboard::standing(db, player.id).await?;
    Ok(HttpResponse::Ok().json(StandingResponse::new(player, standing)))
}

/// The board itself is public; `/me` needs a bearer token.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(top));
    cfg.service(
        web::resource("/me")
            .wrap(JwtExtract)
            .route(web::get().to(me)),
    );
}
