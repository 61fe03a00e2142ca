//! Site-wide totals for the landing page.

use sea_orm::ConnectionTrait;

use crate::error::AppError;
use crate::repos::{aggregates, players, score_records};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalStats {
    pub total_players: u64,
    pub total_rewards: u64,
    pub games_played: u64,
}

pub async fn global_stats<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<GlobalStats, AppError> {
    Ok(GlobalStats {
        total_players: players::count(conn).await?,
        total_rewards: aggregates::total_earned_all(conn).await?,
        games_played: score_records::count_all(conn).await?,
    })
}
