use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use super::{require_db, txn_policy};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

pub type TxnFuture<'a, R> = Pin<Box<dyn Future<Output = Result<R, AppError>> + Send + 'a>>;

/// A transaction injected into request extensions; `with_txn` reuses it
/// and leaves commit/rollback to whoever created it.
#[derive(Clone)]
pub struct SharedTxn(pub Arc<DatabaseTransaction>);

impl SharedTxn {
    /// Begin a transaction meant to be shared across several calls.
    pub async fn open(conn: &DatabaseConnection) -> Result<Self, AppError> {
        Ok(Self(Arc::new(conn.begin().await?)))
    }

    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.0
    }

    /// Roll back. Fails if other clones are still alive.
    pub async fn rollback(self) -> Result<(), AppError> {
        let txn = Arc::try_unwrap(self.0).map_err(|_| {
            AppError::internal(
                ErrorCode::Internal,
                "shared transaction still has live references",
            )
        })?;
        txn.rollback().await?;
        Ok(())
    }
}

impl SharedTxn {
    /// The shared transaction injected into `req`, if any.
    pub fn from_req(req: Option<&HttpRequest>) -> Option<SharedTxn> {
        req.and_then(|r| r.extensions().get::<SharedTxn>().cloned())
    }
}

/// Run `f` inside a transaction.
///
/// With a `SharedTxn` in the request extensions, `f` runs on it untouched.
/// Otherwise a new transaction is opened; `Ok` applies the process
/// [`txn_policy`], `Err` rolls back and returns the original error.
///
/// The closure must own what it captures:
/// `with_txn(None, &state, move |txn| Box::pin(async move { ... }))`.
/// The request is only inspected up front, so the returned future is `Send`
/// whenever the closure's future is.
pub fn with_txn<'s, R, F>(
    req: Option<&HttpRequest>,
    state: &'s AppState,
    f: F,
) -> impl Future<Output = Result<R, AppError>> + 's
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R> + 's,
    R: 's,
{
    with_shared_txn(SharedTxn::from_req(req), state, f)
}

/// [`with_txn`] for callers that already pulled the `SharedTxn` out of the request.
pub fn with_shared_txn<'s, R, F>(
    shared: Option<SharedTxn>,
    state: &'s AppState,
    f: F,
) -> impl Future<Output = Result<R, AppError>> + 's
where
    F: for<'a> FnOnce(&'a DatabaseTransaction) -> TxnFuture<'a, R> + 's,
    R: 's,
{
    async move {
        if let Some(shared) = shared {
            return f(shared.transaction()).await;
        }

        let txn = require_db(state)?.begin().await?;
        match f(&txn).await {
            Ok(val) => {
                match txn_policy::current() {
                    txn_policy::TxnPolicy::CommitOnOk => txn.commit().await?,
                    txn_policy::TxnPolicy::RollbackOnOk => txn.rollback().await?,
                }
                Ok(val)
            }
            Err(err) => {
                if let Err(rb) = txn.rollback().await {
                    tracing::warn!(error = %rb, "rollback after failed closure also failed");
                }
                Err(err)
            }
        }
    }
}
