pub mod error_shape;
pub mod healthcheck;
pub mod leaderboard;
pub mod players;
pub mod scores;
