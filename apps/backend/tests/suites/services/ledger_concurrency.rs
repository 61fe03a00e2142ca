use std::sync::Arc;

use backend::db::require_db;
use backend::domain::GameKind;
use backend::errors::ErrorCode;
use backend::repos::{aggregates, score_records};
use backend::services::ledger::LedgerService;
use backend::state::app_state::AppState;
use backend::{AppError, SubmitOutcome, SubmitScore};
use tokio::task::JoinSet;

use crate::support::factory::{
    color_rush_50000, create_test_player, daily_cap_only, memory_hard_9000, with_id,
    without_cooldown, NOW,
};
use crate::support::test_state::build_test_state_with;

async fn burst(
    state: Arc<AppState>,
    player_id: i64,
    inputs: Vec<SubmitScore>,
) -> Vec<Result<SubmitOutcome, AppError>> {
    let mut set = JoinSet::new();
    for input in inputs {
        let state = state.clone();
        set.spawn(async move { LedgerService::submit(&state, None, player_id, input, NOW).await });
    }
    let mut results = Vec::new();
    while let Some(joined) = set.join_next().await {
        results.push(joined.expect("submit task panicked"));
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ten_concurrent_submissions_never_exceed_daily_cap() -> Result<(), AppError> {
    let state = Arc::new(build_test_state_with(daily_cap_only(30)).await?);
    let db = require_db(&state)?;
    let player = create_test_player(db, "burst").await?;

    let inputs = (0..10)
        .map(|i| with_id(color_rush_50000(), format!("burst-{i}")))
        .collect();
    let results = burst(state.clone(), player.id, inputs).await;

    let credited: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(credited.len(), 6, "exactly six 5-unit plays fit under 30");
    assert!(credited.iter().all(|o| o.reward_units == 5 && !o.replayed));

    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.code(), ErrorCode::DailyLimitReached);
    }

    let total = score_records::total_rewards(db, player.id).await?;
    assert_eq!(total, 30);
    let aggregate = aggregates::find(db, player.id).await?.unwrap();
    assert_eq!(aggregate.balance, 30);
    assert_eq!(aggregate.total_earned, 30);
    assert_eq!(aggregate.games_played, 6);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_plays_of_one_kind_respect_per_game_caps() -> Result<(), AppError> {
    let state = Arc::new(build_test_state_with(without_cooldown()).await?);
    let db = require_db(&state)?;
    let player = create_test_player(db, "per-game").await?;

    let inputs = (0..5)
        .map(|i| with_id(memory_hard_9000(), format!("mem-{i}")))
        .collect();
    let results = burst(state.clone(), player.id, inputs).await;

    let mut units: Vec<u32> = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(|o| o.reward_units)
        .collect();
    units.sort_unstable();
    // 4 units, then only the 1 left under the per-game earn cap of 5
    assert_eq!(units, vec![1, 4]);

    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(err.code(), ErrorCode::GameDailyLimitReached);
    }

    let today = score_records::list_for_day(db, player.id, NOW.date()).await?;
    assert_eq!(today.len(), 2);
    assert!(today.iter().all(|r| r.game_kind == GameKind::Memory));
    assert_eq!(today.iter().map(|r| r.reward_units).sum::<u32>(), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_submissions_credit_once() -> Result<(), AppError> {
    let state = Arc::new(build_test_state_with(without_cooldown()).await?);
    let db = require_db(&state)?;
    let player = create_test_player(db, "dupes").await?;

    let inputs = (0..4)
        .map(|_| with_id(memory_hard_9000(), "same-session"))
        .collect();
    let results = burst(state.clone(), player.id, inputs).await;

    let outcomes: Vec<_> = results
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .expect("replays of the same result are not errors");
    assert_eq!(outcomes.iter().filter(|o| !o.replayed).count(), 1);
    assert_eq!(outcomes.iter().filter(|o| o.replayed).count(), 3);
    let record_id = outcomes[0].record_id;
    assert!(outcomes.iter().all(|o| o.record_id == record_id));

    assert_eq!(score_records::total_rewards(db, player.id).await?, 4);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_players_do_not_share_quota() -> Result<(), AppError> {
    let state = Arc::new(build_test_state_with(daily_cap_only(5)).await?);
    let db = require_db(&state)?;
    let alice = create_test_player(db, "alice").await?;
    let bob = create_test_player(db, "bob").await?;

    let (a, b) = tokio::join!(
        LedgerService::submit(&state, None, alice.id, color_rush_50000(), NOW),
        LedgerService::submit(&state, None, bob.id, color_rush_50000(), NOW),
    );
    assert_eq!(a?.reward_units, 5);
    assert_eq!(b?.reward_units, 5);
    Ok(())
}
