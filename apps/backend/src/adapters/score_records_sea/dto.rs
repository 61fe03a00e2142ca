//! DTOs for score_records_sea adapter.

use time::{Date, OffsetDateTime};

/// One ledger row. Game kind and difficulty are already in their stored string form.
#[derive(Debug, Clone)]
pub struct ScoreRecordCreate {
    pub player_id: i64,
    pub game_kind: String,
    pub difficulty: String,
    pub score: i64,
    pub duration_seconds: i64,
    pub reward_units: i32,
    pub calendar_date: Date,
    pub submission_key: String,
    pub new_best_score: bool,
    pub created_at: OffsetDateTime,
}
