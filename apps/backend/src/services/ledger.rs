//! Score submission: validation, quota guard, reward crediting and the
//! leaderboard projection, applied atomically per player.
//!
//! The critical section is a per-player async mutex wrapped around one
//! database transaction (plus a row lock on Postgres). Everything inside
//! either commits together or rolls back together, and the whole submission
//! runs under the configured deadline.

use std::time::Duration;

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::config::rewards::RewardsConfig;
use crate::db::txn::{with_shared_txn, SharedTxn};
use crate::domain::quota::{self, DailyStatus, QuotaConfig, QuotaDenial};
use crate::domain::streak::next_streak;
use crate::domain::{Difficulty, GameKind};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, ValidationKind};
use crate::logging::pii::Redacted;
use crate::repos::aggregates::{self, PlayerAggregate};
use crate::repos::leaderboard::{self, LeaderboardEntry};
use crate::repos::score_records::{self, NewScoreRecord, ScoreRecord};
use crate::repos::{best_scores, players};
use crate::state::app_state::AppState;

/// Longest client-supplied submission id accepted as an idempotency key.
pub const MAX_SUBMISSION_ID_LEN: usize = 128;

/// A raw session result as reported by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitScore {
    pub game_kind: GameKind,
    pub score: i64,
    pub duration_seconds: i64,
    pub difficulty: Difficulty,
    /// Client clock in epoch milliseconds; only feeds the derived key
    pub timestamp: Option<i64>,
    /// Session id from the engine, used verbatim as the idempotency key
    pub submission_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub reward_units: u32,
    pub new_best_score: bool,
    pub daily_streak: u32,
    pub balance: u64,
    pub wallet_tx_ref: Option<String>,
    pub block_explorer_url: Option<String>,
    pub replayed: bool,
    pub record_id: i64,
}

/// Input that passed validation, in unsigned form.
#[derive(Debug, Clone)]
struct ValidScore {
    game_kind: GameKind,
    difficulty: Difficulty,
    score: u64,
    duration_seconds: u64,
}

#[derive(Debug)]
struct Applied {
    record: ScoreRecord,
    aggregate: PlayerAggregate,
    replayed: bool,
    wallet_address: Option<String>,
}

pub struct LedgerService;

impl LedgerService {
    /// Submit one session result for `player_id` at `now`.
    ///
    /// A previously seen submission id, or the same id-less payload inside
    /// the replay window, replays the stored outcome without crediting again. Quota denials, validation failures and timeouts leave
    /// no trace in the database.
    pub async fn submit(
        state: &AppState,
        shared: Option<SharedTxn>,
        player_id: i64,
        input: SubmitScore,
        now: OffsetDateTime,
    ) -> Result<SubmitOutcome, AppError> {
        let valid = validate(&input, &state.rewards)?;
        let submission_key = submission_key(player_id, &input)?;

        let rewards = state.rewards.clone();
        let deadline = rewards.submit_timeout;

        let critical = async {
            let _guard = state.player_locks.lock(player_id).await;
            let valid = valid.clone();
            let key = submission_key.clone();
            let rewards = rewards.clone();
            with_shared_txn(shared, state, move |txn| {
                Box::pin(async move { apply(txn, &rewards, player_id, valid, key, now).await })
            })
            .await
        };

        let applied = match tokio::time::timeout(deadline, critical).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    player_id,
                    game_kind = %valid.game_kind,
                    timeout_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                    "Score submission timed out"
                );
                return Err(DomainError::infra(
                    InfraErrorKind::SubmissionTimeout,
                    "Score submission timed out; it is safe to retry",
                )
                .into());
            }
        };

        let mut outcome = SubmitOutcome {
            reward_units: applied.record.reward_units,
            new_best_score: applied.record.new_best_score,
            daily_streak: applied.aggregate.daily_streak,
            balance: applied.aggregate.balance,
            wallet_tx_ref: None,
            block_explorer_url: None,
            replayed: applied.replayed,
            record_id: applied.record.id,
        };

        if applied.replayed {
            info!(
                player_id,
                game_kind = %valid.game_kind,
                record_id = outcome.record_id,
                replayed = true,
                "Score submission replayed"
            );
            return Ok(outcome);
        }

        state.leaderboard_cache.invalidate();
        info!(
            player_id,
            game_kind = %valid.game_kind,
            difficulty = %valid.difficulty,
            score = valid.score,
            reward_units = outcome.reward_units,
            new_best_score = outcome.new_best_score,
            balance = outcome.balance,
            replayed = false,
            "Score credited"
        );

        if let (Some(wallet), Some(transfer)) = (&applied.wallet_address, &state.token_transfer) {
            if outcome.reward_units > 0 {
                match transfer.transfer(wallet, outcome.reward_units).await {
                    Ok(receipt) => {
                        outcome.wallet_tx_ref = Some(receipt.tx_ref);
                        outcome.block_explorer_url = receipt.block_explorer_url;
                    }
                    Err(e) => {
                        warn!(
                            player_id,
                            wallet = %Redacted(wallet),
                            reward_units = outcome.reward_units,
                            error = %e,
                            "Token transfer failed; internal balance kept"
                        );
                    }
                }
            }
        }

        Ok(outcome)
    }
}

/// Today's quota position for every game kind, read outside the critical section.
pub async fn daily_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    quota_cfg: &QuotaConfig,
    player_id: i64,
    now: OffsetDateTime,
) -> Result<DailyStatus, AppError> {
    let today: Vec<_> = score_records::list_for_day(conn, player_id, now.date())
        .await?
        .iter()
        .map(ScoreRecord::day_record)
        .collect();
    Ok(quota::daily_status(&today, now, quota_cfg))
}

fn validate(input: &SubmitScore, rewards: &RewardsConfig) -> Result<ValidScore, DomainError> {
    let score = u64::try_from(input.score).map_err(|_| {
        DomainError::validation(ValidationKind::InvalidScore, "score must be non-negative")
    })?;
    let duration_seconds = u64::try_from(input.duration_seconds).map_err(|_| {
        DomainError::validation(
            ValidationKind::InvalidScore,
            "duration_seconds must be non-negative",
        )
    })?;
    rewards
        .reward
        .check_plausible(score, duration_seconds, input.game_kind)?;

    Ok(ValidScore {
        game_kind: input.game_kind,
        difficulty: input.difficulty,
        score,
        duration_seconds,
    })
}

/// Idempotency key of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionKey {
    /// Engine session id; replays for as long as its record exists
    Client(String),
    /// Payload digest; replays only within the replay window
    Derived(String),
}

impl SubmissionKey {
    /// Key written on a record created at `now`.
    ///
    /// Derived keys carry the window bucket, so the same payload can be
    /// stored again once the earlier record has aged out of the window.
    pub fn stored(&self, now: OffsetDateTime, window: Duration) -> String {
        match self {
            Self::Client(id) => id.clone(),
            Self::Derived(digest) => format!("{digest}.{}", window_bucket(now, window)),
        }
    }

    /// Stored keys of earlier records that may still replay at `now`, newest first.
    fn lookups(&self, now: OffsetDateTime, window: Duration) -> Vec<String> {
        match self {
            Self::Client(id) => vec![id.clone()],
            Self::Derived(digest) => {
                let bucket = window_bucket(now, window);
                vec![format!("{digest}.{bucket}"), format!("{digest}.{}", bucket - 1)]
            }
        }
    }

    fn replays(&self, record: &ScoreRecord, now: OffsetDateTime, window: Duration) -> bool {
        match self {
            Self::Client(_) => true,
            Self::Derived(_) => (now - record.created_at).whole_seconds() < window_secs(window),
        }
    }
}

fn window_secs(window: Duration) -> i64 {
    i64::try_from(window.as_secs()).unwrap_or(i64::MAX).max(1)
}

fn window_bucket(now: OffsetDateTime, window: Duration) -> i64 {
    now.unix_timestamp().div_euclid(window_secs(window))
}

/// The client's submission id when present, otherwise a blake3 digest of the payload.
pub fn submission_key(
    player_id: i64,
    input: &SubmitScore,
) -> Result<SubmissionKey, DomainError> {
    if let Some(id) = &input.submission_id {
        let id = id.trim();
        if id.is_empty() || id.len() > MAX_SUBMISSION_ID_LEN {
            return Err(DomainError::validation(
                ValidationKind::InvalidParameter,
                format!("submission_id must be 1 to {MAX_SUBMISSION_ID_LEN} characters"),
            ));
        }
        return Ok(SubmissionKey::Client(id.to_string()));
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(&player_id.to_le_bytes());
    hasher.update(input.game_kind.as_str().as_bytes());
    hasher.update(&input.score.to_le_bytes());
    hasher.update(&input.duration_seconds.to_le_bytes());
    hasher.update(input.difficulty.as_str().as_bytes());
    match input.timestamp {
        Some(ts) => hasher.update(&ts.to_le_bytes()),
        None => hasher.update(b"-"),
    };
    Ok(SubmissionKey::Derived(hasher.finalize().to_hex().to_string()))
}

fn same_result(record: &ScoreRecord, valid: &ValidScore) -> bool {
    record.game_kind == valid.game_kind
        && record.difficulty == valid.difficulty
        && record.score == valid.score
        && record.duration_seconds == valid.duration_seconds
}

async fn apply(
    txn: &DatabaseTransaction,
    rewards: &RewardsConfig,
    player_id: i64,
    valid: ValidScore,
    submission_key: SubmissionKey,
    now: OffsetDateTime,
) -> Result<Applied, AppError> {
    let player = players::require(txn, player_id).await?;
    aggregates::ensure_zeroed(txn, player_id, now).await?;
    let aggregate = aggregates::lock_for_update(txn, player_id).await?;

    let window = rewards.replay_window;
    if let Some(record) = find_replayable(txn, player_id, &submission_key, now, window).await? {
        if !same_result(&record, &valid) {
            return Err(DomainError::conflict(
                ConflictKind::DuplicateSubmission,
                "submission_id was already used for a different result",
            )
            .into());
        }
        return Ok(Applied {
            record,
            aggregate,
            replayed: true,
            wallet_address: None,
        });
    }

    let today: Vec<_> = score_records::list_for_day(txn, player_id, now.date())
        .await?
        .iter()
        .map(ScoreRecord::day_record)
        .collect();
    let headroom = quota::evaluate(&today, valid.game_kind, now, &rewards.quota)
        .map_err(|denial| deny(player_id, valid.game_kind, denial))?;

    let reward = rewards
        .reward
        .reward(valid.score, valid.game_kind, valid.difficulty);
    let credited = headroom.credit(reward);

    let new_best_score =
        best_scores::raise(txn, player_id, valid.game_kind, valid.score, now).await?;

    let record = score_records::insert(
        txn,
        NewScoreRecord {
            player_id,
            game_kind: valid.game_kind,
            difficulty: valid.difficulty,
            score: valid.score,
            duration_seconds: valid.duration_seconds,
            reward_units: credited,
            submission_key: submission_key.stored(now, window),
            new_best_score,
            created_at: now,
        },
    )
    .await?;

    let streak = next_streak(aggregate.daily_streak, aggregate.last_played_at, now);
    let aggregate = aggregates::credit_play(txn, player_id, credited, streak, now).await?;

    let global_best = best_scores::global_best(txn, player_id).await?;
    let entry = LeaderboardEntry {
        player_id,
        display_name: player.display_name.clone(),
        best_score: global_best.as_ref().map_or(0, |b| b.best_score),
        best_score_at: global_best.as_ref().map(|b| b.achieved_at),
        total_earned: aggregate.total_earned,
        daily_streak: aggregate.daily_streak,
        updated_at: now,
    };
    leaderboard::upsert(txn, &entry).await?;

    Ok(Applied {
        record,
        aggregate,
        replayed: false,
        wallet_address: player.wallet_address,
    })
}

async fn find_replayable(
    txn: &DatabaseTransaction,
    player_id: i64,
    key: &SubmissionKey,
    now: OffsetDateTime,
    window: Duration,
) -> Result<Option<ScoreRecord>, DomainError> {
    for stored in key.lookups(now, window) {
        let found = score_records::find_by_submission_key(txn, player_id, &stored).await?;
        if let Some(record) = found.filter(|r| key.replays(r, now, window)) {
            return Ok(Some(record));
        }
    }
    Ok(None)
}

fn deny(player_id: i64, game_kind: GameKind, denial: QuotaDenial) -> DomainError {
    info!(
        player_id,
        game_kind = %game_kind,
        reason = denial.code().as_str(),
        remaining_minutes = denial.remaining_minutes(),
        "Score submission denied by quota"
    );
    DomainError::Quota(denial)
}
