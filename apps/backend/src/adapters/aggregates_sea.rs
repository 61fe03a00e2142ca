//! SeaORM adapter for player_aggregates.
//!
//! Counters are only ever moved with SQL-side increments so that a stale read
//! can never overwrite a newer balance.

use sea_orm::sea_query::{Alias, Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, EntityTrait, QueryFilter, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::player_aggregates;

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<player_aggregates::Model>, sea_orm::DbErr> {
    player_aggregates::Entity::find_by_id(player_id)
        .one(conn)
        .await
}

/// Create the zeroed aggregate row if it does not exist yet.
pub async fn ensure_zeroed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    now: OffsetDateTime,
) -> Result<(), sea_orm::DbErr> {
    let active = player_aggregates::ActiveModel {
        player_id: Set(player_id),
        balance: Set(0),
        total_earned: Set(0),
        games_played: Set(0),
        daily_streak: Set(0),
        last_played_at: Set(None),
        updated_at: Set(now),
    };

    player_aggregates::Entity::insert(active)
        .on_conflict(
            OnConflict::column(player_aggregates::Column::PlayerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Read the aggregate row, holding a row lock until the transaction ends on Postgres.
///
/// SQLite serializes writers at the database level, so the plain read is enough there.
pub async fn lock_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<player_aggregates::Model>, sea_orm::DbErr> {
    let query = player_aggregates::Entity::find_by_id(player_id);
    match conn.get_database_backend() {
        DatabaseBackend::Postgres => query.lock_exclusive().one(conn).await,
        _ => query.one(conn).await,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AggregateCredit {
    pub player_id: i64,
    pub reward_units: i64,
    pub daily_streak: i32,
    pub played_at: OffsetDateTime,
}

/// Add one play and its reward to the aggregate.
///
/// Returns the number of rows touched (0 when the row is missing).
pub async fn apply_credit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    credit: AggregateCredit,
) -> Result<u64, sea_orm::DbErr> {
    use player_aggregates::Column;

    let result = player_aggregates::Entity::update_many()
        .col_expr(Column::Balance, Expr::col(Column::Balance).add(credit.reward_units))
        .col_expr(
            Column::TotalEarned,
            Expr::col(Column::TotalEarned).add(credit.reward_units),
        )
        .col_expr(Column::GamesPlayed, Expr::col(Column::GamesPlayed).add(1i64))
        .col_expr(Column::DailyStreak, Expr::value(credit.daily_streak))
        .col_expr(Column::LastPlayedAt, Expr::value(Some(credit.played_at)))
        .col_expr(Column::UpdatedAt, Expr::value(credit.played_at))
        .filter(Column::PlayerId.eq(credit.player_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Sum of `total_earned` over every player.
pub async fn sum_total_earned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<i64, sea_orm::DbErr> {
    // SUM over BIGINT is NUMERIC on Postgres
    let total: Option<Option<i64>> = player_aggregates::Entity::find()
        .select_only()
        .column_as(
            Expr::col(player_aggregates::Column::TotalEarned)
                .sum()
                .cast_as(Alias::new("BIGINT")),
            "total",
        )
        .into_tuple()
        .one(conn)
        .await?;
    Ok(total.flatten().unwrap_or(0))
}
