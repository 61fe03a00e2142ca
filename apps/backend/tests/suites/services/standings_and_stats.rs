use backend::db::require_db;
use backend::services::leaderboard;
use backend::services::ledger::LedgerService;
use backend::services::stats;
use backend::AppError;

use crate::support::build_test_state;
use crate::support::factory::{
    color_rush_50000, create_test_player, memory_hard_9000, minutes_after, NOW,
};

#[tokio::test]
async fn standing_follows_board_order() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let ada = create_test_player(db, "standing-ada").await?;
    let carol = create_test_player(db, "standing-carol").await?;
    let bob = create_test_player(db, "standing-bob").await?;

    LedgerService::submit(&state, None, ada.id, color_rush_50000(), NOW).await?;
    LedgerService::submit(&state, None, bob.id, memory_hard_9000(), NOW).await?;
    // same score as ada, reached later
    LedgerService::submit(&state, None, carol.id, color_rush_50000(), minutes_after(NOW, 1))
        .await?;

    let ada_standing = leaderboard::standing(db, ada.id).await?;
    let carol_standing = leaderboard::standing(db, carol.id).await?;
    let bob_standing = leaderboard::standing(db, bob.id).await?;

    let ada_rank = ada_standing.rank.expect("ada is ranked");
    assert_eq!(carol_standing.rank, Some(ada_rank + 1));
    assert!(bob_standing.rank.expect("bob is ranked") > ada_rank + 1);

    assert_eq!(ada_standing.best_score, 50000);
    assert_eq!(ada_standing.total_earned, 5);
    assert_eq!(ada_standing.daily_streak, 1);
    assert_eq!(bob_standing.best_score, 9000);
    assert_eq!(bob_standing.total_earned, 4);
    Ok(())
}

#[tokio::test]
async fn players_without_plays_are_unranked() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let idle = create_test_player(db, "standing-idle").await?;

    let standing = leaderboard::standing(db, idle.id).await?;
    assert_eq!(standing.rank, None);
    assert_eq!(standing.best_score, 0);
    assert_eq!(standing.total_earned, 0);
    assert_eq!(standing.daily_streak, 0);

    let unknown = leaderboard::standing(db, i64::MAX).await?;
    assert_eq!(unknown.rank, None);
    Ok(())
}

#[tokio::test]
async fn global_stats_count_players_rewards_and_plays() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let before = stats::global_stats(db).await?;

    let ada = create_test_player(db, "stats-ada").await?;
    let bob = create_test_player(db, "stats-bob").await?;
    create_test_player(db, "stats-idle").await?;

    LedgerService::submit(&state, None, ada.id, memory_hard_9000(), NOW).await?;
    LedgerService::submit(&state, None, ada.id, color_rush_50000(), minutes_after(NOW, 1))
        .await?;
    LedgerService::submit(&state, None, bob.id, memory_hard_9000(), NOW).await?;
    // a retry is not another game
    let retry =
        LedgerService::submit(&state, None, bob.id, memory_hard_9000(), minutes_after(NOW, 2))
            .await?;
    assert!(retry.replayed);

    let after = stats::global_stats(db).await?;
    assert_eq!(after.total_players - before.total_players, 3);
    assert_eq!(after.total_rewards - before.total_rewards, 4 + 5 + 4);
    assert_eq!(after.games_played - before.games_played, 3);
    Ok(())
}
