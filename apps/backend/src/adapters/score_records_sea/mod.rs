//! SeaORM adapter for the append-only score_records table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::Date;

use crate::entities::score_records;

pub mod dto;

pub use dto::ScoreRecordCreate;

pub async fn find_by_submission_key<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    submission_key: &str,
) -> Result<Option<score_records::Model>, sea_orm::DbErr> {
    score_records::Entity::find()
        .filter(score_records::Column::PlayerId.eq(player_id))
        .filter(score_records::Column::SubmissionKey.eq(submission_key))
        .one(conn)
        .await
}

/// All records for one player on one calendar date, oldest first.
pub async fn list_for_day<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    calendar_date: Date,
) -> Result<Vec<score_records::Model>, sea_orm::DbErr> {
    score_records::Entity::find()
        .filter(score_records::Column::PlayerId.eq(player_id))
        .filter(score_records::Column::CalendarDate.eq(calendar_date))
        .order_by_asc(score_records::Column::CreatedAt)
        .order_by_asc(score_records::Column::Id)
        .all(conn)
        .await
}

/// Most recent records first.
pub async fn list_recent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    limit: u64,
) -> Result<Vec<score_records::Model>, sea_orm::DbErr> {
    score_records::Entity::find()
        .filter(score_records::Column::PlayerId.eq(player_id))
        .order_by_desc(score_records::Column::CreatedAt)
        .order_by_desc(score_records::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn insert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ScoreRecordCreate,
) -> Result<score_records::Model, sea_orm::DbErr> {
    let active = score_records::ActiveModel {
        id: NotSet,
        player_id: Set(dto.player_id),
        game_kind: Set(dto.game_kind),
        difficulty: Set(dto.difficulty),
        score: Set(dto.score),
        duration_seconds: Set(dto.duration_seconds),
        reward_units: Set(dto.reward_units),
        calendar_date: Set(dto.calendar_date),
        submission_key: Set(dto.submission_key),
        new_best_score: Set(dto.new_best_score),
        created_at: Set(dto.created_at),
    };

    active.insert(conn).await
}

/// Sum of reward units over every record of the player.
pub async fn sum_rewards<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<i64, sea_orm::DbErr> {
    let total: Option<Option<i64>> = score_records::Entity::find()
        .select_only()
        .column_as(Expr::col(score_records::Column::RewardUnits).sum(), "total")
        .filter(score_records::Column::PlayerId.eq(player_id))
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}

/// Every record ever written, across all players.
pub async fn count_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    score_records::Entity::find().count(conn).await
}
