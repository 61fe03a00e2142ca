//! Ranked leaderboard reads behind a short-TTL cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::debug;

use crate::db::require_db;
use crate::domain::GameKind;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::{best_scores, leaderboard};
use crate::state::app_state::AppState;

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 100;

/// One ranked row. Aggregate columns are only present on the global board.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub player_id: i64,
    pub display_name: Option<String>,
    pub best_score: u64,
    pub achieved_at: Option<OffsetDateTime>,
    pub total_earned: Option<u64>,
    pub daily_streak: Option<u32>,
}

/// Where one player sits on the global board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStanding {
    /// `None` until the player has scored or earned something
    pub rank: Option<u64>,
    pub best_score: u64,
    pub total_earned: u64,
    pub daily_streak: u32,
}

type CacheKey = (Option<GameKind>, u64);

/// Rankings keyed by `(kind, limit)`. A zero TTL disables caching.
#[derive(Clone)]
pub struct LeaderboardCache {
    inner: Option<Cache<CacheKey, Arc<Vec<LeaderboardRow>>>>,
}

impl std::fmt::Debug for LeaderboardCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardCache")
            .field("enabled", &self.inner.is_some())
            .finish()
    }
}

impl LeaderboardCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(256)
                .time_to_live(ttl)
                .build()
        });
        Self { inner }
    }

    /// Drop every cached ranking; called after a submission commits.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.inner {
            cache.invalidate_all();
        }
    }

    async fn get(&self, key: &CacheKey) -> Option<Arc<Vec<LeaderboardRow>>> {
        match &self.inner {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn put(&self, key: CacheKey, rows: Arc<Vec<LeaderboardRow>>) {
        if let Some(cache) = &self.inner {
            cache.insert(key, rows).await;
        }
    }
}

/// Resolve the optional `limit` query value against the default and the maximum.
pub fn resolve_limit(limit: Option<u64>) -> Result<u64, AppError> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
        Some(n) => Err(AppError::invalid(
            ErrorCode::InvalidParameter,
            format!("limit must be between 1 and {MAX_LIMIT}, got {n}"),
        )),
    }
}

fn rank_of(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

/// Load the ranking straight from the database.
pub async fn load<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_kind: Option<GameKind>,
    limit: u64,
) -> Result<Vec<LeaderboardRow>, AppError> {
    let rows = match game_kind {
        None => leaderboard::top(conn, limit)
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, e)| LeaderboardRow {
                rank: rank_of(i),
                player_id: e.player_id,
                display_name: e.display_name,
                best_score: e.best_score,
                achieved_at: e.best_score_at,
                total_earned: Some(e.total_earned),
                daily_streak: Some(e.daily_streak),
            })
            .collect(),
        Some(kind) => best_scores::top_for_kind(conn, kind, limit)
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, r)| LeaderboardRow {
                rank: rank_of(i),
                player_id: r.best.player_id,
                display_name: r.display_name,
                best_score: r.best.best_score,
                achieved_at: Some(r.best.achieved_at),
                total_earned: None,
                daily_streak: None,
            })
            .collect(),
    };
    Ok(rows)
}

/// Cached ranking for `game_kind` (or the global board), at most `limit` rows.
pub async fn top(
    state: &AppState,
    game_kind: Option<GameKind>,
    limit: u64,
) -> Result<Arc<Vec<LeaderboardRow>>, AppError> {
    let key = (game_kind, limit);
    if let Some(rows) = state.leaderboard_cache.get(&key).await {
        debug!(game_kind = ?game_kind, limit, "Leaderboard cache hit");
        return Ok(rows);
    }

    let db = require_db(state)?;
    let rows = Arc::new(load(db, game_kind, limit).await?);
    state.leaderboard_cache.put(key, rows.clone()).await;
    Ok(rows)
}

/// The player's own rank, read uncached so it reflects their latest submission.
pub async fn standing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<PlayerStanding, AppError> {
    let Some(entry) = leaderboard::find(conn, player_id).await? else {
        return Ok(PlayerStanding {
            rank: None,
            best_score: 0,
            total_earned: 0,
            daily_streak: 0,
        });
    };
    let rank = leaderboard::position(conn, &entry).await?;
    Ok(PlayerStanding {
        rank,
        best_score: entry.best_score,
        total_earned: entry.total_earned,
        daily_streak: entry.daily_streak,
    })
}
