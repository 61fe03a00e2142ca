use backend::db::require_db;
use backend::domain::GameKind;
use backend::errors::ErrorCode;
use backend::repos::{aggregates, players as players_repo};
use backend::services::ledger::LedgerService;
use backend::services::players::{self, IdentityClaims};
use backend::AppError;
use backend_test_support::unique_helpers::unique_sub;

use crate::support::build_test_state;
use crate::support::factory::{
    color_rush_50000, create_test_player, days_after, memory_hard_9000, minutes_after, with_id,
    NOW,
};

fn claims(sub: &str, name: Option<&str>) -> IdentityClaims {
    IdentityClaims {
        sub: sub.to_string(),
        display_name: name.map(str::to_string),
        email: Some(format!("{sub}@example.test")),
    }
}

#[tokio::test]
async fn ensure_player_provisions_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let sub = unique_sub("ensure_once");

    let first = players::ensure_player(db, claims(&sub, Some("Ada")), NOW).await?;
    let second = players::ensure_player(db, claims(&sub, Some("Ada")), NOW).await?;
    assert_eq!(first.id, second.id);

    let aggregate = aggregates::find(db, first.id)
        .await?
        .expect("aggregate is created with the player");
    assert_eq!(aggregate.balance, 0);
    assert_eq!(aggregate.daily_streak, 0);
    assert!(aggregate.last_played_at.is_none());
    Ok(())
}

#[tokio::test]
async fn ensure_player_refreshes_identity_but_keeps_known_fields() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let sub = unique_sub("refresh");

    players::ensure_player(db, claims(&sub, Some("Old Name")), NOW).await?;
    let renamed = players::ensure_player(db, claims(&sub, Some("New Name")), NOW).await?;
    assert_eq!(renamed.display_name.as_deref(), Some("New Name"));

    // a token without a name leaves the stored one alone
    let kept = players::ensure_player(db, claims(&sub, None), NOW).await?;
    assert_eq!(kept.display_name.as_deref(), Some("New Name"));

    let found = players_repo::find_by_sub(db, &sub).await?.unwrap();
    assert_eq!(found.id, renamed.id);
    Ok(())
}

#[tokio::test]
async fn referral_code_links_new_player_to_inviter() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let inviter = create_test_player(db, "inviter").await?;
    assert!(inviter.referral_code.starts_with(players::REFERRAL_PREFIX));
    assert!(inviter.invited_by.is_none());

    // codes are matched case-insensitively
    let code = format!(" {} ", inviter.referral_code.to_ascii_lowercase());
    let invitee = players::ensure_player_with_referral(
        db,
        claims(&unique_sub("invitee"), Some("Invitee")),
        Some(&code),
        NOW,
    )
    .await?;
    assert_eq!(invitee.invited_by, Some(inviter.id));
    assert_ne!(invitee.referral_code, inviter.referral_code);

    let found = players_repo::find_by_referral_code(db, &invitee.referral_code)
        .await?
        .unwrap();
    assert_eq!(found.id, invitee.id);
    Ok(())
}

#[tokio::test]
async fn unknown_or_late_referral_codes_are_ignored() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let inviter = create_test_player(db, "late-inviter").await?;

    let stranger = players::ensure_player_with_referral(
        db,
        claims(&unique_sub("stranger"), None),
        Some("NOT-A-CODE"),
        NOW,
    )
    .await?;
    assert!(stranger.invited_by.is_none());

    // an existing player cannot pick an inviter after the fact
    let sub = unique_sub("already-here");
    let existing = players::ensure_player(db, claims(&sub, None), NOW).await?;
    let again = players::ensure_player_with_referral(
        db,
        claims(&sub, None),
        Some(&inviter.referral_code),
        minutes_after(NOW, 5),
    )
    .await?;
    assert_eq!(again.id, existing.id);
    assert!(again.invited_by.is_none());
    assert_eq!(again.referral_code, existing.referral_code);
    Ok(())
}

#[tokio::test]
async fn link_wallet_validates_shape() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "wallet-shape").await?;

    let bad_addresses = [
        "",
        "0x123",
        "52908400098527886E0F7030069857D2E4169EE7",
        "0xZZ908400098527886E0F7030069857D2E4169EE7",
    ];
    for bad in bad_addresses {
        let err = players::link_wallet(db, player.id, bad, NOW)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidWallet, "accepted {bad:?}");
    }

    let linked = players::link_wallet(
        db,
        player.id,
        " 0x52908400098527886E0F7030069857D2E4169EE7 ",
        NOW,
    )
    .await?;
    assert_eq!(
        linked.wallet_address.as_deref(),
        Some("0x52908400098527886E0F7030069857D2E4169EE7")
    );
    Ok(())
}

#[tokio::test]
async fn link_wallet_for_unknown_player_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let err = players::link_wallet(
        db,
        424_242_424,
        "0x52908400098527886E0F7030069857D2E4169EE7",
        NOW,
    )
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);
    Ok(())
}

#[tokio::test]
async fn profile_collects_aggregate_and_best_scores() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "profile").await?;

    LedgerService::submit(&state, None, player.id, memory_hard_9000(), NOW).await?;
    LedgerService::submit(
        &state,
        None,
        player.id,
        color_rush_50000(),
        minutes_after(NOW, 1),
    )
    .await?;

    let profile = players::profile(db, player.id).await?;
    assert_eq!(profile.player.id, player.id);
    assert_eq!(profile.aggregate.balance, 9);
    assert_eq!(profile.aggregate.games_played, 2);
    assert_eq!(profile.aggregate.last_played_at, Some(minutes_after(NOW, 1)));

    let mut kinds: Vec<GameKind> = profile.best_scores.iter().map(|b| b.game_kind).collect();
    kinds.sort();
    assert_eq!(kinds, vec![GameKind::Memory, GameKind::ColorRush]);
    Ok(())
}

#[tokio::test]
async fn history_is_newest_first_and_limited() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_test_player(db, "history").await?;

    for day in 0..3 {
        let input = with_id(memory_hard_9000(), format!("h-{day}"));
        LedgerService::submit(&state, None, player.id, input, days_after(NOW, day)).await?;
    }

    let all = players::history(db, player.id, 10).await?;
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].created_at, days_after(NOW, 2));
    assert_eq!(all[2].created_at, NOW);

    let two = players::history(db, player.id, 2).await?;
    assert_eq!(two.len(), 2);
    assert_eq!(two[0].id, all[0].id);

    assert_eq!(players::resolve_history_limit(None)?, 20);
    assert_eq!(
        players::resolve_history_limit(Some(0)).unwrap_err().code(),
        ErrorCode::InvalidParameter
    );
    Ok(())
}
