//! SeaORM adapter for leaderboard_entries.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use time::OffsetDateTime;

use crate::entities::leaderboard_entries;

#[derive(Debug, Clone)]
pub struct LeaderboardUpsert {
    pub player_id: i64,
    pub display_name: Option<String>,
    pub best_score: i64,
    pub best_score_at: Option<OffsetDateTime>,
    pub total_earned: i64,
    pub daily_streak: i32,
    pub updated_at: OffsetDateTime,
}

pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: LeaderboardUpsert,
) -> Result<(), sea_orm::DbErr> {
    use leaderboard_entries::Column;

    let active = leaderboard_entries::ActiveModel {
        player_id: Set(dto.player_id),
        display_name: Set(dto.display_name),
        best_score: Set(dto.best_score),
        best_score_at: Set(dto.best_score_at),
        total_earned: Set(dto.total_earned),
        daily_streak: Set(dto.daily_streak),
        updated_at: Set(dto.updated_at),
    };

    leaderboard_entries::Entity::insert(active)
        .on_conflict(
            OnConflict::column(Column::PlayerId)
                .update_columns([
                    Column::DisplayName,
                    Column::BestScore,
                    Column::BestScoreAt,
                    Column::TotalEarned,
                    Column::DailyStreak,
                    Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<leaderboard_entries::Model>, sea_orm::DbErr> {
    leaderboard_entries::Entity::find_by_id(player_id)
        .one(conn)
        .await
}

/// Players that never scored or earned are left off the global board.
fn ranked() -> Select<leaderboard_entries::Entity> {
    use leaderboard_entries::Column;

    leaderboard_entries::Entity::find().filter(
        Condition::any()
            .add(Column::BestScore.gt(0))
            .add(Column::TotalEarned.gt(0)),
    )
}

/// Board order: best score, then earliest achievement, then player id.
fn board_order(select: Select<leaderboard_entries::Entity>) -> Select<leaderboard_entries::Entity> {
    use leaderboard_entries::Column;

    select
        .order_by_desc(Column::BestScore)
        .order_by_asc(Column::BestScoreAt)
        .order_by_asc(Column::PlayerId)
}

/// Global ranking.
pub async fn top<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<leaderboard_entries::Model>, sea_orm::DbErr> {
    board_order(ranked()).limit(limit).all(conn).await
}

/// Ranked players with a strictly higher best score.
pub async fn count_above<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    best_score: i64,
) -> Result<u64, sea_orm::DbErr> {
    ranked()
        .filter(leaderboard_entries::Column::BestScore.gt(best_score))
        .count(conn)
        .await
}

/// Ids of ranked players sharing `best_score`, in board order.
pub async fn tied_player_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    best_score: i64,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    use leaderboard_entries::Column;

    board_order(ranked().filter(Column::BestScore.eq(best_score)))
        .select_only()
        .column(Column::PlayerId)
        .into_tuple::<i64>()
        .all(conn)
        .await
}
