//! Reward, quota and ledger tunables, read from the environment once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::game_kind::GameKind;
use crate::domain::quota::QuotaConfig;
use crate::domain::reward::RewardConfig;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardsConfig {
    pub reward: RewardConfig,
    pub quota: QuotaConfig,
    pub submit_timeout: Duration,
    /// How long an id-less submission with the same payload counts as a retry
    pub replay_window: Duration,
    /// Zero disables leaderboard caching
    pub leaderboard_cache_ttl: Duration,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            reward: RewardConfig::default(),
            quota: QuotaConfig::default(),
            submit_timeout: Duration::from_millis(10_000),
            replay_window: Duration::from_secs(600),
            leaderboard_cache_ttl: Duration::from_millis(5_000),
        }
    }
}

impl RewardsConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let quota = QuotaConfig {
            daily_cap: parse_var("DAILY_CAP", defaults.quota.daily_cap)?,
            per_game_plays: parse_var("PER_GAME_PLAYS", defaults.quota.per_game_plays)?,
            per_game_earn_cap: parse_var("PER_GAME_EARN_CAP", defaults.quota.per_game_earn_cap)?,
            cooldown_seconds: parse_var("COOLDOWN_SECONDS", defaults.quota.cooldown_seconds)?,
        };

        let mut reward = defaults.reward;
        for kind in GameKind::ALL {
            let name = format!("REWARD_DIVISOR_{}", kind.env_suffix());
            let divisor: u64 = parse_var(&name, reward.divisor(kind))?;
            if divisor == 0 {
                return Err(AppError::config(format!("{name} must be greater than zero")));
            }
            reward.divisors.insert(kind, divisor);
        }

        let replay_window_secs: u64 =
            parse_var("REPLAY_WINDOW_SECONDS", defaults.replay_window.as_secs())?;
        if replay_window_secs == 0 {
            return Err(AppError::config("REPLAY_WINDOW_SECONDS must be greater than zero"));
        }

        Ok(Self {
            reward,
            quota,
            replay_window: Duration::from_secs(replay_window_secs),
            submit_timeout: Duration::from_millis(parse_var(
                "SUBMIT_TIMEOUT_MS",
                duration_ms(defaults.submit_timeout),
            )?),
            leaderboard_cache_ttl: Duration::from_millis(parse_var(
                "LEADERBOARD_CACHE_TTL_MS",
                duration_ms(defaults.leaderboard_cache_ttl),
            )?),
        })
    }
}

/// Optional on-chain payout service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTransferConfig {
    pub url: Option<String>,
    pub block_explorer_url: Option<String>,
}

impl TokenTransferConfig {
    pub fn from_env() -> Self {
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            url: non_empty("TOKEN_TRANSFER_URL"),
            block_explorer_url: non_empty("BLOCK_EXPLORER_URL"),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn parse_var<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("{name}: cannot parse '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}
