//! SeaORM -> DomainError translation.
//!
//! Adapters hand back raw `DbErr`; this is the single place that turns them
//! into domain errors. Raw driver messages are only ever logged redacted.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Custom error raised by adapters when a stored enum string does not decode.
pub const CORRUPT_PREFIX: &str = "DATA_CORRUPTION:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Known unique indexes, matched by Postgres constraint name or SQLite `table.column`.
fn unique_conflict(msg: &str) -> Option<(ConflictKind, &'static str)> {
    if msg.contains("ux_score_records_player_submission")
        || msg.contains("score_records.submission_key")
    {
        return Some((
            ConflictKind::DuplicateSubmission,
            "Submission already recorded",
        ));
    }
    if msg.contains("ux_players_sub") || msg.contains("players.sub") {
        return Some((
            ConflictKind::Other("UniquePlayerSub".into()),
            "Player already exists",
        ));
    }
    if msg.contains("ux_player_best_scores_player_kind")
        || msg.contains("player_best_scores.player_id")
    {
        return Some((
            ConflictKind::Other("Unique".into()),
            "Best score row already exists",
        ));
    }
    None
}

pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::Custom(custom) if custom.starts_with(CORRUPT_PREFIX) => {
            error!(trace_id = %trace_id, raw_error = %Redacted(custom), "Stored value failed to decode");
            return DomainError::infra(InfraErrorKind::DataCorruption, "Stored data is corrupt");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unique constraint violation");
        if let Some((kind, detail)) = unique_conflict(&msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(ConflictKind::Other("Unique".into()), "Unique constraint violation");
    }

    if mentions_sqlstate(&msg, "23503") || msg.contains("FOREIGN KEY constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if mentions_sqlstate(&msg, "23514") || msg.contains("CHECK constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Check constraint violation");
        return DomainError::validation_other("Check constraint violation");
    }

    if msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("database is locked")
        || msg.contains("pool")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database timeout or pool issue");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unhandled database error");
    DomainError::infra(InfraErrorKind::Other("DbErr".into()), "Database operation failed")
}
