use actix_web::http::StatusCode;
use actix_web::test;
use backend::extractors::REFERRAL_HEADER;
use backend::AppError;
use backend_test_support::unique_helpers::{unique_email, unique_sub};
use serde_json::{json, Value};

use crate::common::assert_problem;
use crate::support::auth::bearer_header;
use crate::support::{build_test_state, create_test_app};

const WALLET: &str = "0xAbCdEf0123456789aBcDeF0123456789AbCdEf01";

#[actix_web::test]
async fn me_provisions_player_on_first_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("me"), &unique_email("me"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["display_name"], "Test Player");
    assert_eq!(first["balance"], 0);
    assert_eq!(first["games_played"], 0);
    assert_eq!(first["daily_streak"], 0);
    assert!(first["last_played_at"].is_null());
    assert!(first["wallet_address"].is_null());
    assert_eq!(first["best_scores"], json!([]));

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["id"], first["id"]);
    Ok(())
}

#[actix_web::test]
async fn me_reflects_submitted_scores() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("me-scores"), &unique_email("me-scores"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::post()
        .uri("/api/scores")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({
            "game_kind": "memory",
            "score": 9000,
            "duration_seconds": 90,
            "difficulty": "hard"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["balance"], 4);
    assert_eq!(me["total_earned"], 4);
    assert_eq!(me["games_played"], 1);
    assert_eq!(me["daily_streak"], 1);
    assert!(me["last_played_at"].is_string());
    assert_eq!(me["best_scores"][0]["game_kind"], "memory");
    assert_eq!(me["best_scores"][0]["best_score"], 9000);
    Ok(())
}

#[actix_web::test]
async fn link_wallet_round_trip() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("wallet"), &unique_email("wallet"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::put()
        .uri("/api/players/me/wallet")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "wallet_address": WALLET }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["wallet_address"], WALLET);

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", auth.as_str()))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["wallet_address"], WALLET);
    Ok(())
}

#[actix_web::test]
async fn link_wallet_rejects_bad_addresses() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("bad-wallet"), &unique_email("bad-wallet"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::put()
        .uri("/api/players/me/wallet")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "wallet_address": "0x1234" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::BAD_REQUEST, "INVALID_WALLET").await;

    let req = test::TestRequest::put()
        .uri("/api/players/me/wallet")
        .insert_header(("Authorization", auth.as_str()))
        .set_json(json!({ "address": WALLET }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::BAD_REQUEST, "BAD_REQUEST").await;
    Ok(())
}

#[actix_web::test]
async fn referral_header_is_honoured_on_first_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let inviter_auth =
        bearer_header(&unique_sub("ref-inviter"), &unique_email("ref-inviter"), &state.security);
    let invitee_auth =
        bearer_header(&unique_sub("ref-invitee"), &unique_email("ref-invitee"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", inviter_auth.as_str()))
        .to_request();
    let inviter: Value = test::call_and_read_body_json(&app, req).await;
    let code = inviter["referral_code"].as_str().unwrap().to_string();
    assert!(code.starts_with("SHARP"));
    assert!(inviter["invited_by"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", invitee_auth.as_str()))
        .insert_header((REFERRAL_HEADER, code.as_str()))
        .to_request();
    let invitee: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(invitee["invited_by"], inviter["id"]);
    assert_ne!(invitee["referral_code"], inviter["referral_code"]);
    Ok(())
}
