//! Player aggregate repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use super::{non_negative, to_i64};
use crate::adapters::aggregates_sea::{self as aggregates_adapter, AggregateCredit};
use crate::entities::player_aggregates;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAggregate {
    pub player_id: i64,
    pub balance: u64,
    pub total_earned: u64,
    pub games_played: u64,
    pub daily_streak: u32,
    pub last_played_at: Option<OffsetDateTime>,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<player_aggregates::Model> for PlayerAggregate {
    type Error = DomainError;

    fn try_from(model: player_aggregates::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            player_id: model.player_id,
            balance: non_negative(model.balance, "player_aggregates.balance")?,
            total_earned: non_negative(model.total_earned, "player_aggregates.total_earned")?,
            games_played: non_negative(model.games_played, "player_aggregates.games_played")?,
            daily_streak: u32::try_from(model.daily_streak).unwrap_or(0),
            last_played_at: model.last_played_at,
            updated_at: model.updated_at,
        })
    }
}

fn missing(player_id: i64) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Player,
        format!("Aggregate for player {player_id} not found"),
    )
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<PlayerAggregate>, DomainError> {
    aggregates_adapter::find(conn, player_id)
        .await?
        .map(PlayerAggregate::try_from)
        .transpose()
}

pub async fn ensure_zeroed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    aggregates_adapter::ensure_zeroed(conn, player_id, now).await?;
    Ok(())
}

/// Load the aggregate under a row lock (Postgres) for the rest of the transaction.
pub async fn lock_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<PlayerAggregate, DomainError> {
    aggregates_adapter::lock_for_update(conn, player_id)
        .await?
        .ok_or_else(|| missing(player_id))
        .and_then(PlayerAggregate::try_from)
}

/// Credit one play and return the updated aggregate.
pub async fn credit_play<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    reward_units: u32,
    daily_streak: u32,
    played_at: OffsetDateTime,
) -> Result<PlayerAggregate, DomainError> {
    let credit = AggregateCredit {
        player_id,
        reward_units: to_i64(u64::from(reward_units)),
        daily_streak: i32::try_from(daily_streak).unwrap_or(i32::MAX),
        played_at,
    };
    let touched = aggregates_adapter::apply_credit(conn, credit).await?;
    if touched == 0 {
        return Err(missing(player_id));
    }
    find(conn, player_id).await?.ok_or_else(|| missing(player_id))
}

pub async fn total_earned_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    let total = aggregates_adapter::sum_total_earned(conn).await?;
    non_negative(total, "sum(player_aggregates.total_earned)")
}
