use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::rewards::RewardsConfig;
use crate::services::leaderboard::LeaderboardCache;
use crate::services::player_locks::PlayerLocks;
use crate::services::token_transfer::TokenTransfer;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub rewards: Arc<RewardsConfig>,
    pub player_locks: PlayerLocks,
    pub leaderboard_cache: LeaderboardCache,
    pub token_transfer: Option<Arc<dyn TokenTransfer>>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig, rewards: RewardsConfig) -> Self {
        Self::from_parts(Some(db), security, rewards)
    }

    /// State for routes that never touch the database (health, auth failures).
    pub fn without_db(security: SecurityConfig) -> Self {
        Self::from_parts(None, security, RewardsConfig::default())
    }

    pub(crate) fn from_parts(
        db: Option<DatabaseConnection>,
        security: SecurityConfig,
        rewards: RewardsConfig,
    ) -> Self {
        let leaderboard_cache = LeaderboardCache::new(rewards.leaderboard_cache_ttl);
        Self {
            db,
            security,
            rewards: Arc::new(rewards),
            player_locks: PlayerLocks::default(),
            leaderboard_cache,
            token_transfer: None,
        }
    }

    pub fn with_token_transfer(mut self, transfer: Arc<dyn TokenTransfer>) -> Self {
        self.token_transfer = Some(transfer);
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("rewards", &self.rewards)
            .field("token_transfer", &self.token_transfer)
            .finish_non_exhaustive()
    }
}
