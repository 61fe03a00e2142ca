use actix_web::http::StatusCode;
use actix_web::test;
use backend::state::app_state::AppState;
use backend::{AppError, SecurityConfig};
use backend_test_support::unique_helpers::{unique_email, unique_sub};

use crate::common::assert_problem;
use crate::support::auth::bearer_header;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn problem_trace_id_matches_request_id() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/api/scores/status").to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");

    let problem = assert_problem(resp, StatusCode::UNAUTHORIZED, "UNAUTHORIZED_MISSING_BEARER").await;
    assert_eq!(problem.trace_id, request_id);
    assert_eq!(problem.type_, "https://arcade-rewards.dev/errors/UNAUTHORIZED_MISSING_BEARER");
    assert!(!problem.title.is_empty());
    Ok(())
}

#[actix_web::test]
async fn handler_errors_carry_trace_id_too() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let auth = bearer_header(&unique_sub("shape"), &unique_email("shape"), &state.security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/scores/history?limit=500")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");

    let problem = assert_problem(resp, StatusCode::BAD_REQUEST, "INVALID_PARAMETER").await;
    assert_eq!(problem.trace_id, request_id);
    assert!(problem.detail.contains("500"));
    Ok(())
}

#[actix_web::test]
async fn missing_database_is_503_with_retry_after() -> Result<(), AppError> {
    let security = SecurityConfig::default();
    let auth = bearer_header(&unique_sub("no-db"), &unique_email("no-db"), &security);
    let state = AppState::without_db(security);
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get()
        .uri("/api/players/me")
        .insert_header(("Authorization", auth))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem(resp, StatusCode::SERVICE_UNAVAILABLE, "DB_UNAVAILABLE").await;
    Ok(())
}
