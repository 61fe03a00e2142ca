//! Per-kind best score repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use super::{corrupt, non_negative, to_i64};
use crate::adapters::best_scores_sea as best_adapter;
use crate::domain::GameKind;
use crate::entities::player_best_scores;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct BestScore {
    pub player_id: i64,
    pub game_kind: GameKind,
    pub best_score: u64,
    pub achieved_at: OffsetDateTime,
}

impl TryFrom<player_best_scores::Model> for BestScore {
    type Error = DomainError;

    fn try_from(model: player_best_scores::Model) -> Result<Self, Self::Error> {
        let game_kind: GameKind = model
            .game_kind
            .parse()
            .map_err(|_| corrupt(format!("player_best_scores.game_kind = {}", model.game_kind)))?;
        Ok(Self {
            player_id: model.player_id,
            game_kind,
            best_score: non_negative(model.best_score, "player_best_scores.best_score")?,
            achieved_at: model.achieved_at,
        })
    }
}

/// A ranked best-score row with the owner's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBestScore {
    pub best: BestScore,
    pub display_name: Option<String>,
}

pub async fn find<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    game_kind: GameKind,
) -> Result<Option<BestScore>, DomainError> {
    best_adapter::find(conn, player_id, game_kind.as_str())
        .await?
        .map(BestScore::try_from)
        .transpose()
}

pub async fn list_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Vec<BestScore>, DomainError> {
    best_adapter::list_for_player(conn, player_id)
        .await?
        .into_iter()
        .map(BestScore::try_from)
        .collect()
}

/// Returns true when `score` is strictly greater than the previous best.
pub async fn raise<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    game_kind: GameKind,
    score: u64,
    now: OffsetDateTime,
) -> Result<bool, DomainError> {
    let raised = best_adapter::raise(conn, player_id, game_kind.as_str(), to_i64(score), now).await?;
    Ok(raised)
}

pub async fn global_best<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Option<BestScore>, DomainError> {
    best_adapter::global_best(conn, player_id)
        .await?
        .map(BestScore::try_from)
        .transpose()
}

pub async fn top_for_kind<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_kind: GameKind,
    limit: u64,
) -> Result<Vec<RankedBestScore>, DomainError> {
    best_adapter::top_for_kind(conn, game_kind.as_str(), limit)
        .await?
        .into_iter()
        .map(|(model, player)| {
            Ok(RankedBestScore {
                best: BestScore::try_from(model)?,
                display_name: player.and_then(|p| p.display_name),
            })
        })
        .collect()
}
