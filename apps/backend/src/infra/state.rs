use std::sync::Arc;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::config::rewards::{RewardsConfig, TokenTransferConfig};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::services::token_transfer::{HttpTokenTransfer, TokenTransfer};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Assembles [`AppState`] for both the server binary and tests.
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    security: SecurityConfig,
    rewards: RewardsConfig,
    token_transfer: Option<Arc<dyn TokenTransfer>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: None,
            security: SecurityConfig::default(),
            rewards: RewardsConfig::default(),
            token_transfer: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardsConfig) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_token_transfer(mut self, transfer: Arc<dyn TokenTransfer>) -> Self {
        self.token_transfer = Some(transfer);
        self
    }

    /// Use `HttpTokenTransfer` when `TOKEN_TRANSFER_URL` is set; otherwise leave transfers off.
    pub fn with_token_transfer_from_env(self) -> Result<Self, AppError> {
        let cfg = TokenTransferConfig::from_env();
        match HttpTokenTransfer::from_config(&cfg)? {
            Some(http) => Ok(self.with_token_transfer(Arc::new(http))),
            None => Ok(self),
        }
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db_kind {
            Some(kind) => Some(bootstrap_db(self.env, kind).await?),
            None => None,
        };
        let mut state = AppState::from_parts(db, self.security, self.rewards);
        if let Some(transfer) = self.token_transfer {
            state = state.with_token_transfer(transfer);
        }
        Ok(state)
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
