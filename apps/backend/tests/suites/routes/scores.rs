use actix_web::http::StatusCode;
use actix_web::test;
use backend::AppError;
use backend_test_support::unique_helpers::{unique_email, unique_sub};
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::auth::bearer_header;
use crate::support::factory::{daily_cap_only, without_cooldown};
use crate::support::test_state::build_test_state_with;
use crate::support::{build_test_state, create_test_app};

fn submit(auth: &str, body: Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/api/scores")
        .insert_header(("Authorization", auth))
        .set_json(body)
        .to_request()
}

fn get(auth: &str, uri: &str) -> actix_http::Request {
    test::TestRequest::get()
        .uri(uri)
        .insert_header(("Authorization", auth))
        .to_request()
}

#[actix_web::test]
async fn submit_credits_and_returns_outcome() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("submit"), &unique_email("submit"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let resp = test::call_service(
        &app,
        submit(
            &auth,
            json!({
                "game_kind": "memory",
                "score": 9000,
                "duration_seconds": 90,
                "difficulty": "hard",
                "submission_id": "01J0ROUTE"
            }),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["reward_units"], 4);
    assert_eq!(body["new_best_score"], true);
    assert_eq!(body["daily_streak"], 1);
    assert_eq!(body["balance"], 4);
    assert_eq!(body["replayed"], false);
    assert!(body["record_id"].as_i64().is_some());
    assert!(body.get("wallet_tx_ref").is_none());
    Ok(())
}

#[actix_web::test]
async fn resubmitting_the_same_session_replays() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("replay"), &unique_email("replay"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let payload = json!({
        "game_kind": "color-rush",
        "score": 50000,
        "duration_seconds": 60,
        "submission_id": "01J0REPLAY"
    });
    let first: Value = test::call_and_read_body_json(&app, submit(&auth, payload.clone())).await;
    let second: Value = test::call_and_read_body_json(&app, submit(&auth, payload)).await;

    assert_eq!(first["reward_units"], 5);
    assert_eq!(second["replayed"], true);
    assert_eq!(second["record_id"], first["record_id"]);
    assert_eq!(second["balance"], 5);
    Ok(())
}

#[actix_web::test]
async fn cooldown_denial_carries_remaining_minutes_and_retry_after() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("cooldown"), &unique_email("cooldown"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let play = |id: &str| {
        json!({
            "game_kind": "memory",
            "score": 9000,
            "duration_seconds": 90,
            "submission_id": id
        })
    };
    let resp = test::call_service(&app, submit(&auth, play("cd-1"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, submit(&auth, play("cd-2"))).await;
    let retry_after: u32 = resp
        .headers()
        .get("Retry-After")
        .expect("cooldown denial sets Retry-After")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let problem = assert_problem(resp, StatusCode::TOO_MANY_REQUESTS, "COOLDOWN_ACTIVE").await;
    let minutes = problem.remaining_minutes.expect("remaining_minutes member");
    assert!((59..=60).contains(&minutes), "got {minutes}");
    assert_eq!(retry_after, minutes * 60);
    Ok(())
}

#[actix_web::test]
async fn daily_limit_denial_is_429_without_minutes() -> Result<(), AppError> {
    let state = build_test_state_with(daily_cap_only(5)).await?;
    let auth = bearer_header(&unique_sub("daily"), &unique_email("daily"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let play = |id: &str| {
        json!({
            "game_kind": "color-rush",
            "score": 50000,
            "duration_seconds": 60,
            "submission_id": id
        })
    };
    let resp = test::call_service(&app, submit(&auth, play("d-1"))).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, submit(&auth, play("d-2"))).await;
    let problem = assert_problem(resp, StatusCode::TOO_MANY_REQUESTS, "DAILY_LIMIT_REACHED").await;
    assert_eq!(problem.detail, "daily limit reached");
    assert!(problem.remaining_minutes.is_none());
    Ok(())
}

#[actix_web::test]
async fn invalid_submissions_are_400() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("invalid"), &unique_email("invalid"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let cases = [
        (
            json!({"game_kind": "memory", "score": -1, "duration_seconds": 30}),
            "INVALID_SCORE",
        ),
        (
            json!({"game_kind": "pinball", "score": 10, "duration_seconds": 30}),
            "INVALID_GAME_KIND",
        ),
        (
            json!({"game_kind": "tap-reaction", "score": 90000, "duration_seconds": 3}),
            "IMPLAUSIBLE_SCORE",
        ),
        (
            json!({"game_kind": "memory", "score": 10, "duration_seconds": 30, "difficulty": "nightmare"}),
            "INVALID_PARAMETER",
        ),
        (json!({"game_kind": "memory"}), "BAD_REQUEST"),
    ];
    for (body, code) in cases {
        let resp = test::call_service(&app, submit(&auth, body)).await;
        assert_problem(resp, StatusCode::BAD_REQUEST, code).await;
    }

    let req = test::TestRequest::post()
        .uri("/api/scores")
        .insert_header(("Authorization", auth.as_str()))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    Ok(())
}

#[actix_web::test]
async fn status_lists_every_game() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("status"), &unique_email("status"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let resp = test::call_service(
        &app,
        submit(
            &auth,
            json!({"game_kind": "memory", "score": 9000, "duration_seconds": 90, "difficulty": "hard"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::call_and_read_body_json(&app, get(&auth, "/api/scores/status")).await;
    assert_eq!(body["total_earned_today"], 4);
    assert_eq!(body["daily_cap"], 30);
    assert_eq!(body["can_earn_more"], true);

    let games = body["games"].as_array().unwrap();
    assert_eq!(games.len(), 5);
    let memory = games.iter().find(|g| g["game_kind"] == "memory").unwrap();
    assert_eq!(memory["plays_today"], 1);
    assert_eq!(memory["cooldown_active"], true);
    assert_eq!(memory["can_play"], false);
    assert!(memory["next_play_at"].is_string());
    let rush = games.iter().find(|g| g["game_kind"] == "color-rush").unwrap();
    assert_eq!(rush["can_play"], true);
    assert!(rush["next_play_at"].is_null());
    Ok(())
}

#[actix_web::test]
async fn history_returns_newest_first_and_validates_limit() -> Result<(), AppError> {
    let state = build_test_state_with(without_cooldown()).await?;
    let auth = bearer_header(&unique_sub("history"), &unique_email("history"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    for (kind, score) in [("memory", 9000), ("color-rush", 50000)] {
        let resp = test::call_service(
            &app,
            submit(
                &auth,
                json!({"game_kind": kind, "score": score, "duration_seconds": 60}),
            ),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let body: Value =
        test::call_and_read_body_json(&app, get(&auth, "/api/scores/history?limit=1")).await;
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["game_kind"], "color-rush");
    assert_eq!(records[0]["difficulty"], "medium");
    assert_eq!(records[0]["reward_units"], 5);

    let body: Value = test::call_and_read_body_json(&app, get(&auth, "/api/scores/history")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let resp = test::call_service(&app, get(&auth, "/api/scores/history?limit=0")).await;
    assert_problem(resp, StatusCode::BAD_REQUEST, "INVALID_PARAMETER").await;

    let resp = test::call_service(&app, get(&auth, "/api/scores/history?limit=abc")).await;
    assert_problem(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    Ok(())
}
