//! SeaORM adapter for the players table.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::players;

pub mod dto;

pub use dto::PlayerCreate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(player_id).one(conn).await
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Sub.eq(sub))
        .one(conn)
        .await
}

/// Insert the player unless `sub` already exists, then read the row back.
///
/// Returns `(player, inserted)`. A concurrent insert of the same `sub` is
/// absorbed by the `ON CONFLICT DO NOTHING` and the winner's row is returned.
pub async fn ensure_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
    now: OffsetDateTime,
) -> Result<(players::Model, bool), sea_orm::DbErr> {
    let sub = dto.sub.clone();

    let active = players::ActiveModel {
        id: NotSet,
        sub: Set(dto.sub),
        display_name: Set(dto.display_name),
        email: Set(dto.email),
        wallet_address: Set(None),
        referral_code: Set(dto.referral_code),
        invited_by: Set(dto.invited_by),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let rows = players::Entity::insert(active)
        .on_conflict(
            OnConflict::column(players::Column::Sub)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    let inserted = rows == 1;
    let player = find_by_sub(conn, &sub)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("players.sub not found".to_string()))?;

    Ok((player, inserted))
}

pub async fn find_by_referral_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::ReferralCode.eq(code))
        .one(conn)
        .await
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    players::Entity::find().count(conn).await
}

pub async fn set_wallet<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    wallet_address: Option<String>,
    now: OffsetDateTime,
) -> Result<players::Model, sea_orm::DbErr> {
    let player = players::Entity::find_by_id(player_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("players.id not found".to_string()))?;

    let mut active: players::ActiveModel = player.into();
    active.wallet_address = Set(wallet_address);
    active.updated_at = Set(now);
    active.update(conn).await
}

/// Refresh the identity fields mirrored from the token when they changed.
pub async fn refresh_identity<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player: players::Model,
    display_name: Option<String>,
    email: Option<String>,
    now: OffsetDateTime,
) -> Result<players::Model, sea_orm::DbErr> {
    if player.display_name == display_name && player.email == email {
        return Ok(player);
    }

    let mut active: players::ActiveModel = player.into();
    active.display_name = Set(display_name);
    active.email = Set(email);
    active.updated_at = Set(now);
    active.update(conn).await
}
