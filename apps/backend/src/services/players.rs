//! Player provisioning, profile reads and wallet linking.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;

use crate::adapters::players_sea::PlayerCreate;
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::aggregates::{self, PlayerAggregate};
use crate::repos::best_scores::{self, BestScore};
use crate::repos::players::{self, Player};
use crate::repos::score_records::{self, ScoreRecord};

pub const DEFAULT_HISTORY_LIMIT: u64 = 20;
pub const MAX_HISTORY_LIMIT: u64 = 100;

pub const REFERRAL_PREFIX: &str = "SHARP";
const REFERRAL_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REFERRAL_SUFFIX_LEN: usize = 6;
const REFERRAL_ATTEMPTS: usize = 5;

static WALLET_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap()
});

/// Identity claims mirrored into the local player row.
#[derive(Debug, Clone)]
pub struct IdentityClaims {
    pub sub: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    pub player: Player,
    pub aggregate: PlayerAggregate,
    pub best_scores: Vec<BestScore>,
}

/// Find the player for `claims.sub`, creating it with a zeroed aggregate on first sight.
///
/// Two first requests racing on the same `sub` both end up with the same row.
pub async fn ensure_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    claims: IdentityClaims,
    now: OffsetDateTime,
) -> Result<Player, AppError> {
    ensure_player_with_referral(conn, claims, None, now).await
}

/// Like [`ensure_player`], recording the inviter when a new player arrives
/// with someone's referral code. Unknown codes are ignored, and existing
/// players keep whatever inviter they had.
pub async fn ensure_player_with_referral<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    claims: IdentityClaims,
    referral_code: Option<&str>,
    now: OffsetDateTime,
) -> Result<Player, AppError> {
    if let Some(existing) = players::find_by_sub(conn, &claims.sub).await? {
        let display_name = claims.display_name.or(existing.display_name.clone());
        let email = claims.email.or(existing.email.clone());
        let player = players::refresh_identity(conn, existing.id, display_name, email, now).await?;
        return Ok(player);
    }

    let invited_by = match referral_code.map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => {
            let inviter = players::find_by_referral_code(conn, &code.to_ascii_uppercase()).await?;
            if inviter.is_none() {
                info!(referral_code = code, "Unknown referral code ignored");
            }
            inviter.map(|p| p.id)
        }
        None => None,
    };

    let mut dto = PlayerCreate::new(claims.sub, unused_referral_code(conn).await?);
    dto.display_name = claims.display_name;
    dto.email = claims.email;
    dto.invited_by = invited_by;

    let (player, inserted) = players::ensure_by_sub(conn, dto, now).await?;
    aggregates::ensure_zeroed(conn, player.id, now).await?;
    if inserted {
        info!(
            player_id = player.id,
            email = %Redacted(player.email.as_deref().unwrap_or("")),
            invited_by = ?player.invited_by,
            "Player provisioned"
        );
    }
    Ok(player)
}

/// `SHARP` followed by six upper-case base-36 characters.
pub fn generate_referral_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..REFERRAL_SUFFIX_LEN)
        .map(|_| char::from(REFERRAL_ALPHABET[rng.random_range(0..REFERRAL_ALPHABET.len())]))
        .collect();
    format!("{REFERRAL_PREFIX}{suffix}")
}

async fn unused_referral_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<String, AppError> {
    for _ in 0..REFERRAL_ATTEMPTS {
        let code = generate_referral_code(&mut rand::rng());
        if players::find_by_referral_code(conn, &code).await?.is_none() {
            return Ok(code);
        }
    }
    Err(AppError::internal(
        ErrorCode::Internal,
        "could not allocate a free referral code",
    ))
}

pub async fn profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<PlayerProfile, AppError> {
    let player = players::require(conn, player_id).await?;
    let aggregate = match aggregates::find(conn, player_id).await? {
        Some(aggregate) => aggregate,
        None => PlayerAggregate {
            player_id,
            balance: 0,
            total_earned: 0,
            games_played: 0,
            daily_streak: 0,
            last_played_at: None,
            updated_at: player.updated_at,
        },
    };
    let best_scores = best_scores::list_for_player(conn, player_id).await?;
    Ok(PlayerProfile {
        player,
        aggregate,
        best_scores,
    })
}

pub fn validate_wallet(address: &str) -> Result<(), DomainError> {
    if WALLET_ADDRESS.is_match(address) {
        Ok(())
    } else {
        Err(DomainError::validation(
            ValidationKind::InvalidWallet,
            "wallet address must be 0x followed by 40 hex digits",
        ))
    }
}

pub async fn link_wallet<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    address: &str,
    now: OffsetDateTime,
) -> Result<Player, AppError> {
    let address = address.trim();
    validate_wallet(address)?;
    players::require(conn, player_id).await?;
    let player = players::set_wallet(conn, player_id, Some(address.to_string()), now).await?;
    info!(player_id, wallet = %Redacted(address), "Wallet linked");
    Ok(player)
}

pub fn resolve_history_limit(limit: Option<u64>) -> Result<u64, AppError> {
    match limit {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(n) if (1..=MAX_HISTORY_LIMIT).contains(&n) => Ok(n),
        Some(n) => Err(AppError::invalid(
            ErrorCode::InvalidParameter,
            format!("limit must be between 1 and {MAX_HISTORY_LIMIT}, got {n}"),
        )),
    }
}

/// Most recent score records first.
pub async fn history<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    limit: u64,
) -> Result<Vec<ScoreRecord>, AppError> {
    Ok(score_records::list_recent(conn, player_id, limit).await?)
}
