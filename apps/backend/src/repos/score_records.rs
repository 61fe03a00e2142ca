//! Score record repository functions.

use sea_orm::ConnectionTrait;
use time::{Date, OffsetDateTime};

use super::{corrupt, non_negative, to_i64};
use crate::adapters::score_records_sea::{self as records_adapter, ScoreRecordCreate};
use crate::domain::{DayRecord, Difficulty, GameKind};
use crate::entities::score_records;
use crate::errors::domain::DomainError;

/// One credited (or zero-credited) play.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: i64,
    pub player_id: i64,
    pub game_kind: GameKind,
    pub difficulty: Difficulty,
    pub score: u64,
    pub duration_seconds: u64,
    pub reward_units: u32,
    pub calendar_date: Date,
    pub submission_key: String,
    pub new_best_score: bool,
    pub created_at: OffsetDateTime,
}

impl ScoreRecord {
    pub fn day_record(&self) -> DayRecord {
        DayRecord {
            game_kind: self.game_kind,
            reward_units: self.reward_units,
            created_at: self.created_at,
        }
    }
}

impl TryFrom<score_records::Model> for ScoreRecord {
    type Error = DomainError;

    fn try_from(model: score_records::Model) -> Result<Self, Self::Error> {
        let game_kind: GameKind = model
            .game_kind
            .parse()
            .map_err(|_| corrupt(format!("score_records.game_kind = {}", model.game_kind)))?;
        let difficulty: Difficulty = model
            .difficulty
            .parse()
            .map_err(|_| corrupt(format!("score_records.difficulty = {}", model.difficulty)))?;
        let reward_units = u32::try_from(model.reward_units)
            .map_err(|_| corrupt(format!("score_records.reward_units = {}", model.reward_units)))?;

        Ok(Self {
            id: model.id,
            player_id: model.player_id,
            game_kind,
            difficulty,
            score: non_negative(model.score, "score_records.score")?,
            duration_seconds: non_negative(model.duration_seconds, "score_records.duration_seconds")?,
            reward_units,
            calendar_date: model.calendar_date,
            submission_key: model.submission_key,
            new_best_score: model.new_best_score,
            created_at: model.created_at,
        })
    }
}

/// Insert payload in domain types.
#[derive(Debug, Clone)]
pub struct NewScoreRecord {
    pub player_id: i64,
    pub game_kind: GameKind,
    pub difficulty: Difficulty,
    pub score: u64,
    pub duration_seconds: u64,
    pub reward_units: u32,
    pub submission_key: String,
    pub new_best_score: bool,
    pub created_at: OffsetDateTime,
}

fn decode_all(models: Vec<score_records::Model>) -> Result<Vec<ScoreRecord>, DomainError> {
    models.into_iter().map(ScoreRecord::try_from).collect()
}

pub async fn find_by_submission_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    submission_key: &str,
) -> Result<Option<ScoreRecord>, DomainError> {
    records_adapter::find_by_submission_key(conn, player_id, submission_key)
        .await?
        .map(ScoreRecord::try_from)
        .transpose()
}

/// Records dated `calendar_date`, oldest first.
pub async fn list_for_day<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    calendar_date: Date,
) -> Result<Vec<ScoreRecord>, DomainError> {
    decode_all(records_adapter::list_for_day(conn, player_id, calendar_date).await?)
}

pub async fn list_recent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    limit: u64,
) -> Result<Vec<ScoreRecord>, DomainError> {
    decode_all(records_adapter::list_recent(conn, player_id, limit).await?)
}

/// Append a record. The calendar date is the UTC date of `created_at`.
pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    record: NewScoreRecord,
) -> Result<ScoreRecord, DomainError> {
    let dto = ScoreRecordCreate {
        player_id: record.player_id,
        game_kind: record.game_kind.as_str().to_string(),
        difficulty: record.difficulty.as_str().to_string(),
        score: to_i64(record.score),
        duration_seconds: to_i64(record.duration_seconds),
        reward_units: i32::try_from(record.reward_units).unwrap_or(i32::MAX),
        calendar_date: record.created_at.to_offset(time::UtcOffset::UTC).date(),
        submission_key: record.submission_key,
        new_best_score: record.new_best_score,
        created_at: record.created_at,
    };
    let model = records_adapter::insert(conn, dto).await?;
    ScoreRecord::try_from(model)
}

pub async fn total_rewards<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<u64, DomainError> {
    let total = records_adapter::sum_rewards(conn, player_id).await?;
    non_negative(total, "sum(score_records.reward_units)")
}

pub async fn count_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(records_adapter::count_all(conn).await?)
}
