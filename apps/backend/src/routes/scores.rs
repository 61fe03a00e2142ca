//! Score submission, quota status and history for the authenticated player.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::rfc3339;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::domain::quota::{DailyStatus, GameStatus};
use crate::domain::{Difficulty, GameKind};
use crate::error::AppError;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::errors::ErrorCode;
use crate::extractors::{CurrentPlayer, ValidatedJson};
use crate::repos::score_records::ScoreRecord;
use crate::services::ledger::{self, LedgerService, SubmitOutcome, SubmitScore};
use crate::services::players;
use crate::state::app_state::AppState;

/// Wire form of a session result. Enum fields stay strings so unknown
/// values get their own error codes instead of a generic parse failure.
#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub game_kind: String,
    pub score: i64,
    pub duration_seconds: i64,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub submission_id: Option<String>,
}

impl TryFrom<SubmitScoreRequest> for SubmitScore {
    type Error = AppError;

    fn try_from(body: SubmitScoreRequest) -> Result<Self, Self::Error> {
        let game_kind: GameKind = body.game_kind.parse().map_err(|_| {
            DomainError::validation(
                ValidationKind::UnknownGameKind,
                format!("unknown game kind '{}'", body.game_kind),
            )
        })?;
        let difficulty = match body.difficulty.as_deref() {
            None => Difficulty::default(),
            Some(raw) => raw.parse().map_err(|_| {
                AppError::invalid(
                    ErrorCode::InvalidParameter,
                    format!("unknown difficulty '{raw}'"),
                )
            })?,
        };
        Ok(SubmitScore {
            game_kind,
            score: body.score,
            duration_seconds: body.duration_seconds,
            difficulty,
            timestamp: body.timestamp,
            submission_id: body.submission_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitScoreResponse {
    pub reward_units: u32,
    pub new_best_score: bool,
    pub daily_streak: u32,
    pub balance: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_tx_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_explorer_url: Option<String>,
    pub replayed: bool,
    pub record_id: i64,
}

impl From<SubmitOutcome> for SubmitScoreResponse {
    fn from(o: SubmitOutcome) -> Self {
        Self {
            reward_units: o.reward_units,
            new_best_score: o.new_best_score,
            daily_streak: o.daily_streak,
            balance: o.balance,
            wallet_tx_ref: o.wallet_tx_ref,
            block_explorer_url: o.block_explorer_url,
            replayed: o.replayed,
            record_id: o.record_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameStatusResponse {
    pub game_kind: GameKind,
    pub plays_today: u32,
    pub max_plays: u32,
    pub earned_today: u32,
    pub max_earn: u32,
    pub can_play: bool,
    pub cooldown_active: bool,
    pub cooldown_remaining_minutes: u32,
    pub next_play_at: Option<String>,
}

impl From<GameStatus> for GameStatusResponse {
    fn from(g: GameStatus) -> Self {
        Self {
            game_kind: g.game_kind,
            plays_today: g.plays_today,
            max_plays: g.max_plays,
            earned_today: g.earned_today,
            max_earn: g.max_earn,
            can_play: g.can_play,
            cooldown_active: g.cooldown_active,
            cooldown_remaining_minutes: g.cooldown_remaining_minutes,
            next_play_at: g.next_play_at.map(rfc3339),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyStatusResponse {
    pub games: Vec<GameStatusResponse>,
    pub total_earned_today: u32,
    pub daily_cap: u32,
    pub can_earn_more: bool,
}

impl From<DailyStatus> for DailyStatusResponse {
    fn from(s: DailyStatus) -> Self {
        Self {
            games: s.games.into_iter().map(GameStatusResponse::from).collect(),
            total_earned_today: s.total_earned_today,
            daily_cap: s.daily_cap,
            can_earn_more: s.can_earn_more,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRecordResponse {
    pub id: i64,
    pub game_kind: GameKind,
    pub difficulty: Difficulty,
    pub score: u64,
    pub duration_seconds: u64,
    pub reward_units: u32,
    pub new_best_score: bool,
    pub created_at: String,
}

impl From<ScoreRecord> for ScoreRecordResponse {
    fn from(r: ScoreRecord) -> Self {
        Self {
            id: r.id,
            game_kind: r.game_kind,
            difficulty: r.difficulty,
            score: r.score,
            duration_seconds: r.duration_seconds,
            reward_units: r.reward_units,
            new_best_score: r.new_best_score,
            created_at: rfc3339(r.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

async fn submit(
    http_req: HttpRequest,
    player: CurrentPlayer,
    body: ValidatedJson<SubmitScoreRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let input = SubmitScore::try_from(body.into_inner())?;
    let outcome = LedgerService::submit(
        &app_state,
        SharedTxn::from_req(Some(&http_req)),
        player.id,
        input,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(SubmitScoreResponse::from(outcome)))
}

async fn status(
    player: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let status = ledger::daily_status(
        db,
        &app_state.rewards.quota,
        player.id,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(DailyStatusResponse::from(status)))
}

async fn history(
    player: CurrentPlayer,
    query: web::Query<HistoryQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let limit = players::resolve_history_limit(query.limit)?;
    let db = require_db(&app_state)?;
    let records = players::history(db, player.id, limit).await?;
    let body: Vec<ScoreRecordResponse> = records.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(submit))
        .route("/status", web::get().to(status))
        .route("/history", web::get().to(history));
}
