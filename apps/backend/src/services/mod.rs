//! Application services. Each takes the clock as an argument so tests can pin it.

pub mod leaderboard;
pub mod ledger;
pub mod player_locks;
pub mod players;
pub mod stats;
pub mod token_transfer;
