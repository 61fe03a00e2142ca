// Rollback policy behavior: nothing written through `with_txn` survives.

use backend::db::require_db;
use backend::db::txn::with_txn;
use backend::db::txn_policy::{current, TxnPolicy};
use backend::errors::ErrorCode;
use backend::repos::players as players_repo;
use backend::services::players::{self, IdentityClaims};
use backend::AppError;
use backend_test_support::unique_helpers::unique_sub;

use crate::support::build_test_state;
use crate::support::factory::NOW;

fn identity(sub: &str) -> IdentityClaims {
    IdentityClaims {
        sub: sub.to_string(),
        display_name: Some("Rollback".to_string()),
        email: None,
    }
}

#[actix_web::test]
async fn test_rollback_policy() -> Result<(), AppError> {
    assert_eq!(current(), TxnPolicy::RollbackOnOk);

    let state = build_test_state().await?;
    let sub = unique_sub("rollback_ok");

    let claims = identity(&sub);
    let inside = with_txn(None, &state, move |txn| {
        Box::pin(async move { players::ensure_player(txn, claims, NOW).await })
    })
    .await?;
    assert_eq!(inside.sub, sub);

    let db = require_db(&state)?;
    assert!(
        players_repo::find_by_sub(db, &sub).await?.is_none(),
        "row should not persist after rollback-on-ok"
    );
    Ok(())
}

#[actix_web::test]
async fn test_rollback_policy_on_error() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let sub = unique_sub("rollback_err");

    let claims = identity(&sub);
    let result: Result<(), AppError> = with_txn(None, &state, move |txn| {
        Box::pin(async move {
            players::ensure_player(txn, claims, NOW).await?;
            Err(AppError::internal(ErrorCode::Internal, "boom"))
        })
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);

    let db = require_db(&state)?;
    assert!(players_repo::find_by_sub(db, &sub).await?.is_none());
    Ok(())
}
