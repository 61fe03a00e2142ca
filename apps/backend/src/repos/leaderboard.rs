//! Leaderboard projection repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use super::{non_negative, to_i64};
use crate::adapters::leaderboard_sea::{self as leaderboard_adapter, LeaderboardUpsert};
use crate::entities::leaderboard_entries;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub player_id: i64,
    pub display_name: Option<String>,
    pub best_score: u64,
    pub best_score_at: Option<OffsetDateTime>,
    pub total_earned: u64,
    pub daily_streak: u32,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<leaderboard_entries::Model> for LeaderboardEntry {
    type Error = DomainError;

    fn try_from(model: leaderboard_entries::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            player_id: model.player_id,
            display_name: model.display_name,
            best_score: non_negative(model.best_score, "leaderboard_entries.best_score")?,
            best_score_at: model.best_score_at,
            total_earned: non_negative(model.total_earned, "leaderboard_entries.total_earned")?,
            daily_streak: u32::try_from(model.daily_streak).unwrap_or(0),
            updated_at: model.updated_at,
        })
    }
}

pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    entry: &LeaderboardEntry,
) -> Result<(), DomainError> {
    let dto = LeaderboardUpsert {
        player_id: entry.player_id,
        display_name: entry.display_name.clone(),
        best_score: to_i64(entry.best_score),
        best_score_at: entry.best_score_at,
        total_earned: to_i64(entry.total_earned),
        daily_streak: i32::try_from(entry.daily_streak).unwrap_or(i32::MAX),
        updated_at: entry.updated_at,
    };
    leaderboard_adapter::upsert(conn, dto).await?;
    Ok(())
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<LeaderboardEntry>, DomainError> {
    leaderboard_adapter::find(conn, player_id)
        .await?
        .map(LeaderboardEntry::try_from)
        .transpose()
}

pub async fn top<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<LeaderboardEntry>, DomainError> {
    leaderboard_adapter::top(conn, limit)
        .await?
        .into_iter()
        .map(LeaderboardEntry::try_from)
        .collect()
}

/// 1-based position of `player_id` on the global board, `None` when unranked.
///
/// Counts the players strictly ahead by score, then places the player among
/// the ties in board order, so it always agrees with [`top`].
pub async fn position<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    entry: &LeaderboardEntry,
) -> Result<Option<u64>, DomainError> {
    if entry.best_score == 0 && entry.total_earned == 0 {
        return Ok(None);
    }
    let score = to_i64(entry.best_score);
    let above = leaderboard_adapter::count_above(conn, score).await?;
    let ties = leaderboard_adapter::tied_player_ids(conn, score).await?;
    Ok(ties
        .iter()
        .position(|id| *id == entry.player_id)
        .map(|i| above + i as u64 + 1))
}
