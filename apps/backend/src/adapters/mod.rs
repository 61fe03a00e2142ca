//! SeaORM adapters. Every function returns `DbErr`; the repos layer maps it
//! into `DomainError`.

pub mod aggregates_sea;
pub mod best_scores_sea;
pub mod leaderboard_sea;
pub mod players_sea;
pub mod score_records_sea;
