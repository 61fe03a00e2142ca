use actix_web::http::StatusCode;
use actix_web::test;
use backend::state::app_state::AppState;
use backend::{AppError, SecurityConfig};
use serde_json::Value;

use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn health_reports_db_and_migrations() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-request-id").is_some());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert!(body["app_version"].is_string());
    assert!(body["migrations"].as_str().is_some_and(|m| m.starts_with('m')));
    assert!(body["time"].is_string());
    Ok(())
}

#[actix_web::test]
async fn health_without_db_is_still_200() -> Result<(), AppError> {
    let state = AppState::without_db(SecurityConfig::default());
    let app = create_test_app(state).with_prod_routes().build().await?;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["db"], "unavailable");
    Ok(())
}
