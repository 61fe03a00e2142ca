pub mod leaderboard_entries;
pub mod player_aggregates;
pub mod player_best_scores;
pub mod players;
pub mod score_records;

pub use leaderboard_entries::Entity as LeaderboardEntries;
pub use leaderboard_entries::Model as LeaderboardEntry;
pub use player_aggregates::Entity as PlayerAggregates;
pub use player_aggregates::Model as PlayerAggregate;
pub use player_best_scores::Entity as PlayerBestScores;
pub use player_best_scores::Model as PlayerBestScore;
pub use players::Entity as Players;
pub use players::Model as Player;
pub use score_records::Entity as ScoreRecords;
pub use score_records::Model as ScoreRecord;
