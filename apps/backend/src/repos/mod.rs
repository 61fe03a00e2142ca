//! Repository functions for the domain layer (generic over ConnectionTrait).
//!
//! Repos turn adapter rows into domain structs. Stored strings and counters
//! that fail to decode surface as `DataCorruption`.

use std::fmt::Display;

use crate::errors::domain::DomainError;
use crate::infra::db_errors::CORRUPT_PREFIX;

pub mod aggregates;
pub mod best_scores;
pub mod leaderboard;
pub mod players;
pub mod score_records;

pub(crate) fn corrupt(detail: impl Display) -> DomainError {
    DomainError::from(sea_orm::DbErr::Custom(format!("{CORRUPT_PREFIX} {detail}")))
}

pub(crate) fn non_negative(value: i64, column: &str) -> Result<u64, DomainError> {
    u64::try_from(value).map_err(|_| corrupt(format!("negative {column}: {value}")))
}

pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
