//! Quota guard: daily earn cap, per-game play cap, per-game earn cap and cooldown.
//!
//! Pure functions over the player's records for the current UTC day. The
//! ledger calls [`evaluate`] inside its transaction; the status endpoint uses
//! [`daily_status`] for a read-only summary.

use time::{Duration, OffsetDateTime};

use crate::domain::game_kind::GameKind;
use crate::errors::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaConfig {
    pub daily_cap: u32,
    pub per_game_plays: u32,
    pub per_game_earn_cap: u32,
    /// 0 disables the cooldown check
    pub cooldown_seconds: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_cap: 30,
            per_game_plays: 2,
            per_game_earn_cap: 5,
            cooldown_seconds: 3600,
        }
    }
}

/// The slice of a score record the guard looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRecord {
    pub game_kind: GameKind,
    pub reward_units: u32,
    pub created_at: OffsetDateTime,
}

/// Units still available today, overall and for the evaluated kind. Both are >= 1 on allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headroom {
    pub daily_remaining: u32,
    pub game_remaining: u32,
}

impl Headroom {
    /// Reward actually credited: never more than either remaining headroom.
    pub fn credit(&self, reward: u32) -> u32 {
        reward.min(self.daily_remaining).min(self.game_remaining)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDenial {
    DailyLimitReached,
    GameDailyLimitReached,
    GameRewardCapReached,
    CooldownActive { remaining_minutes: u32 },
}

impl QuotaDenial {
    pub fn code(&self) -> ErrorCode {
        match self {
            QuotaDenial::DailyLimitReached => ErrorCode::DailyLimitReached,
            QuotaDenial::GameDailyLimitReached => ErrorCode::GameDailyLimitReached,
            QuotaDenial::GameRewardCapReached => ErrorCode::GameRewardCapReached,
            QuotaDenial::CooldownActive { .. } => ErrorCode::CooldownActive,
        }
    }

    pub fn message(&self) -> String {
        match self {
            QuotaDenial::DailyLimitReached => "daily limit reached".to_string(),
            QuotaDenial::GameDailyLimitReached => "game daily limit reached".to_string(),
            QuotaDenial::GameRewardCapReached => "game reward cap reached".to_string(),
            QuotaDenial::CooldownActive { .. } => "cooldown active".to_string(),
        }
    }

    pub fn remaining_minutes(&self) -> Option<u32> {
        match self {
            QuotaDenial::CooldownActive { remaining_minutes } => Some(*remaining_minutes),
            _ => None,
        }
    }
}

fn sum_units<'a>(records: impl Iterator<Item = &'a DayRecord>) -> u32 {
    records.fold(0u32, |acc, r| acc.saturating_add(r.reward_units))
}

/// Seconds of cooldown left for `kind`, or `None` when no cooldown is running.
fn cooldown_remaining(
    records: &[DayRecord],
    kind: GameKind,
    now: OffsetDateTime,
    cfg: &QuotaConfig,
) -> Option<(u64, OffsetDateTime)> {
    if cfg.cooldown_seconds == 0 {
        return None;
    }
    let latest = records
        .iter()
        .filter(|r| r.game_kind == kind)
        .map(|r| r.created_at)
        .max()?;

    // future-dated records count as just played
    let elapsed = u64::try_from((now - latest).whole_seconds()).unwrap_or(0);
    if elapsed >= cfg.cooldown_seconds {
        return None;
    }
    let cooldown = Duration::seconds(i64::try_from(cfg.cooldown_seconds).unwrap_or(i64::MAX));
    Some((cfg.cooldown_seconds - elapsed, latest + cooldown))
}

fn ceil_minutes(seconds: u64) -> u32 {
    u32::try_from(seconds.div_ceil(60)).unwrap_or(u32::MAX)
}

/// Checks run in priority order; the first failing one is returned.
pub fn evaluate(
    records_today: &[DayRecord],
    kind: GameKind,
    now: OffsetDateTime,
    cfg: &QuotaConfig,
) -> Result<Headroom, QuotaDenial> {
    let earned_today = sum_units(records_today.iter());
    if earned_today >= cfg.daily_cap {
        return Err(QuotaDenial::DailyLimitReached);
    }

    let plays = records_today.iter().filter(|r| r.game_kind == kind).count();
    if plays >= cfg.per_game_plays as usize {
        return Err(QuotaDenial::GameDailyLimitReached);
    }

    let earned_game = sum_units(records_today.iter().filter(|r| r.game_kind == kind));
    if earned_game >= cfg.per_game_earn_cap {
        return Err(QuotaDenial::GameRewardCapReached);
    }

    if let Some((seconds, _)) = cooldown_remaining(records_today, kind, now, cfg) {
        return Err(QuotaDenial::CooldownActive {
            remaining_minutes: ceil_minutes(seconds),
        });
    }

    Ok(Headroom {
        daily_remaining: cfg.daily_cap - earned_today,
        game_remaining: cfg.per_game_earn_cap - earned_game,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    pub game_kind: GameKind,
    pub plays_today: u32,
    pub max_plays: u32,
    pub earned_today: u32,
    pub max_earn: u32,
    pub can_play: bool,
    pub cooldown_active: bool,
    pub cooldown_remaining_minutes: u32,
    pub next_play_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatus {
    pub games: Vec<GameStatus>,
    pub total_earned_today: u32,
    pub daily_cap: u32,
    pub can_earn_more: bool,
}

pub fn daily_status(
    records_today: &[DayRecord],
    now: OffsetDateTime,
    cfg: &QuotaConfig,
) -> DailyStatus {
    let total_earned_today = sum_units(records_today.iter());
    let games = GameKind::ALL
        .into_iter()
        .map(|kind| {
            let cooldown = cooldown_remaining(records_today, kind, now, cfg);
            GameStatus {
                game_kind: kind,
                plays_today: u32::try_from(
                    records_today.iter().filter(|r| r.game_kind == kind).count(),
                )
                .unwrap_or(u32::MAX),
                max_plays: cfg.per_game_plays,
                earned_today: sum_units(records_today.iter().filter(|r| r.game_kind == kind)),
                max_earn: cfg.per_game_earn_cap,
                can_play: evaluate(records_today, kind, now, cfg).is_ok(),
                cooldown_active: cooldown.is_some(),
                cooldown_remaining_minutes: cooldown.map(|(s, _)| ceil_minutes(s)).unwrap_or(0),
                next_play_at: cooldown.map(|(_, at)| at),
            }
        })
        .collect();

    DailyStatus {
        games,
        total_earned_today,
        daily_cap: cfg.daily_cap,
        can_earn_more: total_earned_today < cfg.daily_cap,
    }
}
