//! Player repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::players_sea as players_adapter;
use crate::entities::players;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Local mirror of an identity-provider account.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: i64,
    pub sub: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub referral_code: String,
    pub invited_by: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            sub: model.sub,
            display_name: model.display_name,
            email: model.email,
            wallet_address: model.wallet_address,
            referral_code: model.referral_code,
            invited_by: model.invited_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_id(conn, player_id).await?;
    Ok(player.map(Player::from))
}

pub async fn require<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Player, DomainError> {
    find_by_id(conn, player_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
    })
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_sub(conn, sub).await?;
    Ok(player.map(Player::from))
}

pub async fn find_by_referral_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    code: &str,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_referral_code(conn, code).await?;
    Ok(player.map(Player::from))
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(players_adapter::count(conn).await?)
}

/// Returns `(player, inserted)`.
pub async fn ensure_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: players_adapter::PlayerCreate,
    now: OffsetDateTime,
) -> Result<(Player, bool), DomainError> {
    let (player, inserted) = players_adapter::ensure_by_sub(conn, dto, now).await?;
    Ok((Player::from(player), inserted))
}

pub async fn refresh_identity<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    display_name: Option<String>,
    email: Option<String>,
    now: OffsetDateTime,
) -> Result<Player, DomainError> {
    let current = players_adapter::find_by_id(conn, player_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
        })?;
    let updated =
        players_adapter::refresh_identity(conn, current, display_name, email, now).await?;
    Ok(Player::from(updated))
}

pub async fn set_wallet<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    wallet_address: Option<String>,
    now: OffsetDateTime,
) -> Result<Player, DomainError> {
    let player = players_adapter::set_wallet(conn, player_id, wallet_address, now).await?;
    Ok(Player::from(player))
}
