use backend::db::require_db;
use backend::domain::GameKind;
use backend::errors::ErrorCode;
use backend::services::ledger::{self, LedgerService};
use backend::AppError;
use time::Duration;

use crate::support::build_test_state;
use crate::support::factory::{
    color_rush_50000, create_test_player, daily_cap_only, memory_hard_9000, minutes_after,
    with_id, without_cooldown, NOW,
};
use crate::support::test_state::build_test_state_with;

#[tokio::test]
async fn cooldown_reports_remaining_minutes_rounded_up() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "cooldown").await?;

    LedgerService::submit(&state, None, player.id, with_id(memory_hard_9000(), "c1"), NOW).await?;

    // 605 s elapsed: 2995 s left, 49.9 minutes
    let at = NOW + Duration::seconds(605);
    let err = LedgerService::submit(&state, None, player.id, with_id(memory_hard_9000(), "c2"), at)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CooldownActive);
    assert_eq!(err.status().as_u16(), 429);
    match err {
        AppError::QuotaExceeded {
            remaining_minutes, ..
        } => assert_eq!(remaining_minutes, Some(50)),
        other => panic!("expected a quota error, got {other:?}"),
    }

    // one second before the cooldown ends still counts as a full minute
    let at = NOW + Duration::seconds(3599);
    let err = LedgerService::submit(&state, None, player.id, with_id(memory_hard_9000(), "c3"), at)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::QuotaExceeded {
            remaining_minutes: Some(1),
            ..
        }
    ));

    // exactly at the boundary the play goes through
    let at = NOW + Duration::seconds(3600);
    let outcome =
        LedgerService::submit(&state, None, player.id, with_id(memory_hard_9000(), "c4"), at)
            .await?;
    assert_eq!(outcome.reward_units, 1);
    Ok(())
}

#[tokio::test]
async fn cooldown_is_per_game_kind() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "cooldown-kind").await?;

    LedgerService::submit(&state, None, player.id, memory_hard_9000(), NOW).await?;
    let other = LedgerService::submit(
        &state,
        None,
        player.id,
        color_rush_50000(),
        minutes_after(NOW, 1),
    )
    .await?;
    assert_eq!(other.reward_units, 5);
    Ok(())
}

#[tokio::test]
async fn single_color_rush_play_saturates_its_earn_cap() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "saturate").await?;

    let first = LedgerService::submit(
        &state,
        None,
        player.id,
        with_id(color_rush_50000(), "cr-1"),
        NOW,
    )
    .await?;
    assert_eq!(first.reward_units, 5);

    // second play is still allowed by count, and past the cooldown, but earns nothing more
    let err = LedgerService::submit(
        &state,
        None,
        player.id,
        with_id(color_rush_50000(), "cr-2"),
        minutes_after(NOW, 61),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameRewardCapReached);
    Ok(())
}

#[tokio::test]
async fn third_play_of_a_kind_hits_the_play_cap() -> Result<(), AppError> {
    let state = build_test_state_with(without_cooldown()).await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "play-cap").await?;

    let mut low = memory_hard_9000();
    low.score = 100;
    for i in 0..2 {
        let outcome = LedgerService::submit(
            &state,
            None,
            player.id,
            with_id(low.clone(), format!("p{i}")),
            minutes_after(NOW, i),
        )
        .await?;
        assert_eq!(outcome.reward_units, 1);
    }

    let err = LedgerService::submit(
        &state,
        None,
        player.id,
        with_id(low, "p2"),
        minutes_after(NOW, 5),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameDailyLimitReached);
    Ok(())
}

#[tokio::test]
async fn reward_is_trimmed_to_remaining_daily_headroom() -> Result<(), AppError> {
    let state = build_test_state_with(daily_cap_only(7)).await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "trim").await?;

    let first = LedgerService::submit(&state, None, player.id, memory_hard_9000(), NOW).await?;
    let second = LedgerService::submit(
        &state,
        None,
        player.id,
        color_rush_50000(),
        minutes_after(NOW, 1),
    )
    .await?;
    assert_eq!(first.reward_units, 4);
    assert_eq!(second.reward_units, 3);
    assert_eq!(second.balance, 7);

    let mut stack = memory_hard_9000();
    stack.game_kind = GameKind::StackGame;
    stack.score = 800;
    let err = LedgerService::submit(&state, None, player.id, stack, minutes_after(NOW, 2))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DailyLimitReached);
    Ok(())
}

#[tokio::test]
async fn daily_cap_resets_on_the_next_utc_day() -> Result<(), AppError> {
    let state = build_test_state_with(daily_cap_only(5)).await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "reset").await?;

    LedgerService::submit(&state, None, player.id, with_id(color_rush_50000(), "d1"), NOW)
        .await?;
    let denied = LedgerService::submit(
        &state,
        None,
        player.id,
        with_id(color_rush_50000(), "d2"),
        minutes_after(NOW, 1),
    )
    .await
    .unwrap_err();
    assert_eq!(denied.code(), ErrorCode::DailyLimitReached);

    // NOW is noon UTC; twelve hours later is the next calendar day
    let tomorrow = LedgerService::submit(
        &state,
        None,
        player.id,
        with_id(color_rush_50000(), "d3"),
        NOW + Duration::hours(12),
    )
    .await?;
    assert_eq!(tomorrow.reward_units, 5);
    assert_eq!(tomorrow.balance, 10);
    Ok(())
}

#[tokio::test]
async fn daily_status_reflects_plays_and_cooldowns() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "status").await?;

    LedgerService::submit(&state, None, player.id, memory_hard_9000(), NOW).await?;

    let status = ledger::daily_status(
        db,
        &state.rewards.quota,
        player.id,
        minutes_after(NOW, 30),
    )
    .await?;
    assert_eq!(status.total_earned_today, 4);
    assert_eq!(status.daily_cap, 30);
    assert!(status.can_earn_more);
    assert_eq!(status.games.len(), GameKind::ALL.len());

    let memory = status
        .games
        .iter()
        .find(|g| g.game_kind == GameKind::Memory)
        .unwrap();
    assert_eq!(memory.plays_today, 1);
    assert_eq!(memory.earned_today, 4);
    assert!(memory.cooldown_active);
    assert_eq!(memory.cooldown_remaining_minutes, 30);
    assert_eq!(memory.next_play_at, Some(minutes_after(NOW, 60)));
    assert!(!memory.can_play);

    let rush = status
        .games
        .iter()
        .find(|g| g.game_kind == GameKind::ColorRush)
        .unwrap();
    assert_eq!(rush.plays_today, 0);
    assert!(rush.can_play);
    assert!(!rush.cooldown_active);
    Ok(())
}
