use actix_web::http::StatusCode;
use actix_web::test;
use backend::db::require_db;
use backend::services::ledger::LedgerService;
use backend::AppError;
use backend_test_support::unique_helpers::{unique_email, unique_sub};
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::auth::bearer_header;
use crate::support::factory::{color_rush_50000, create_test_player, memory_hard_9000, NOW};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn global_and_per_kind_boards() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let ada = create_test_player(db, "ada").await?;
    let bob = create_test_player(db, "bob").await?;
    LedgerService::submit(&state, None, ada.id, color_rush_50000(), NOW).await?;
    LedgerService::submit(&state, None, bob.id, memory_hard_9000(), NOW).await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/leaderboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["game_kind"].is_null());
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries[0]["player_id"], ada.id);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[0]["display_name"], "ada");
    assert_eq!(entries[0]["best_score"], 50000);
    assert_eq!(entries[0]["total_earned"], 5);
    assert_eq!(entries[1]["player_id"], bob.id);

    let req = test::TestRequest::get()
        .uri("/api/leaderboard?game_kind=memory&limit=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["game_kind"], "memory");
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["player_id"], bob.id);
    assert_eq!(entries[0]["best_score"], 9000);
    assert!(entries[0].get("total_earned").is_none());
    Ok(())
}

#[actix_web::test]
async fn bad_query_parameters_are_400() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let cases = [
        ("/api/leaderboard?game_kind=pinball", "INVALID_GAME_KIND"),
        ("/api/leaderboard?limit=0", "INVALID_PARAMETER"),
        ("/api/leaderboard?limit=101", "INVALID_PARAMETER"),
        ("/api/leaderboard?limit=-3", "BAD_REQUEST"),
    ];
    for (uri, code) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem(resp, StatusCode::BAD_REQUEST, code).await;
    }
    Ok(())
}

#[actix_web::test]
async fn my_standing_requires_a_token() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/leaderboard/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_BEARER").await;
    Ok(())
}

#[actix_web::test]
async fn my_standing_tracks_my_submissions() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("standing"), &unique_email("standing"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/leaderboard/me")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;
    assert!(before["rank"].is_null());
    assert_eq!(before["best_score"], 0);
    assert_eq!(before["display_name"], "Test Player");

    let req = test::TestRequest::post()
        .uri("/api/scores")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({
            "game_kind": "color-rush",
            "score": 50000,
            "duration_seconds": 60,
            "difficulty": "medium"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/leaderboard/me")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after["player_id"], before["player_id"]);
    assert!(after["rank"].as_u64().is_some_and(|r| r >= 1));
    assert_eq!(after["best_score"], 50000);
    assert_eq!(after["daily_streak"], 1);
    Ok(())
}
