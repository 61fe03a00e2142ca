//! SeaORM adapter for player_best_scores.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{player_best_scores, players};

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    game_kind: &str,
) -> Result<Option<player_best_scores::Model>, sea_orm::DbErr> {
    player_best_scores::Entity::find()
        .filter(player_best_scores::Column::PlayerId.eq(player_id))
        .filter(player_best_scores::Column::GameKind.eq(game_kind))
        .one(conn)
        .await
}

pub async fn list_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<player_best_scores::Model>, sea_orm::DbErr> {
    player_best_scores::Entity::find()
        .filter(player_best_scores::Column::PlayerId.eq(player_id))
        .order_by_asc(player_best_scores::Column::GameKind)
        .all(conn)
        .await
}

/// Raise the best score for `(player_id, game_kind)` if `score` beats it.
///
/// The first score for a kind inserts the row; later scores only win through
/// the conditional `WHERE best_score < :score` update. Returns whether the
/// stored best changed.
pub async fn raise<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    game_kind: &str,
    score: i64,
    now: OffsetDateTime,
) -> Result<bool, sea_orm::DbErr> {
    let active = player_best_scores::ActiveModel {
        id: NotSet,
        player_id: Set(player_id),
        game_kind: Set(game_kind.to_string()),
        best_score: Set(score),
        achieved_at: Set(now),
    };

    let inserted = player_best_scores::Entity::insert(active)
        .on_conflict(
            OnConflict::columns([
                player_best_scores::Column::PlayerId,
                player_best_scores::Column::GameKind,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    if inserted == 1 {
        return Ok(score > 0);
    }

    let result = player_best_scores::Entity::update_many()
        .col_expr(player_best_scores::Column::BestScore, Expr::value(score))
        .col_expr(player_best_scores::Column::AchievedAt, Expr::value(now))
        .filter(player_best_scores::Column::PlayerId.eq(player_id))
        .filter(player_best_scores::Column::GameKind.eq(game_kind))
        .filter(player_best_scores::Column::BestScore.lt(score))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// The player's highest score over all kinds; earliest achievement wins ties.
pub async fn global_best<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<player_best_scores::Model>, sea_orm::DbErr> {
    player_best_scores::Entity::find()
        .filter(player_best_scores::Column::PlayerId.eq(player_id))
        .order_by_desc(player_best_scores::Column::BestScore)
        .order_by_asc(player_best_scores::Column::AchievedAt)
        .one(conn)
        .await
}

/// Ranked rows for one game kind with the owning player's row attached.
pub async fn top_for_kind<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_kind: &str,
    limit: u64,
) -> Result<Vec<(player_best_scores::Model, Option<players::Model>)>, sea_orm::DbErr> {
    player_best_scores::Entity::find()
        .find_also_related(players::Entity)
        .filter(player_best_scores::Column::GameKind.eq(game_kind))
        .filter(player_best_scores::Column::BestScore.gt(0))
        .order_by_desc(player_best_scores::Column::BestScore)
        .order_by_asc(player_best_scores::Column::AchievedAt)
        .order_by_asc(player_best_scores::Column::PlayerId)
        .limit(limit)
        .all(conn)
        .await
}
