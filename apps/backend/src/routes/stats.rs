use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::error::AppError;
use crate::services::stats::{self, GlobalStats};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_players: u64,
    pub total_rewards: u64,
    pub games_played: u64,
}

impl From<GlobalStats> for StatsResponse {
    fn from(s: GlobalStats) -> Self {
        Self {
            total_players: s.total_players,
            total_rewards: s.total_rewards,
            games_played: s.games_played,
        }
    }
}

async fn global(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let stats = stats::global_stats(db).await?;
    Ok(HttpResponse::Ok().json(StatsResponse::from(stats)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::get().to(global));
}
