use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{db_url, DbKind, DbOwner, RuntimeEnv};
use crate::error::AppError;

const PG_CONNECT_ATTEMPTS: u32 = 5;
const PG_RETRY_INTERVAL_MS: u64 = 500;

fn engine(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect: F,
    max_attempts: u32,
    interval: Duration,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match connect().await {
            Ok(conn) => {
                if attempt > 1 {
                    info!(attempts = attempt, "db connection succeeded after retry");
                }
                return Ok(conn);
            }
            Err(e) if attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %e, "db connection failed, retrying");
                tokio::time::sleep(interval).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn connect_options(url: String, kind: DbKind) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false)
        .acquire_timeout(Duration::from_secs(5));
    match kind {
        // every pooled connection to ":memory:" would be a separate database
        DbKind::SqliteMemory => {
            opts.max_connections(1).min_connections(1);
        }
        DbKind::SqliteFile => {
            opts.max_connections(1);
        }
        DbKind::Postgres => {
            opts.max_connections(20).min_connections(2);
        }
    }
    opts
}

/// Open a pool for `(runtime, kind, owner)`. Does not run migrations.
pub async fn connect_db(
    runtime: RuntimeEnv,
    kind: DbKind,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(runtime, kind, owner)?;
    let attempts = match kind {
        DbKind::Postgres => PG_CONNECT_ATTEMPTS,
        _ => 1,
    };

    let conn = retry_connection(
        || {
            let opts = connect_options(url.clone(), kind);
            async move { Database::connect(opts).await.map_err(AppError::from) }
        },
        attempts,
        Duration::from_millis(PG_RETRY_INTERVAL_MS),
    )
    .await?;

    info!(engine = engine(kind), runtime = ?runtime, owner = ?owner, "db connected");
    Ok(conn)
}

async fn migrate_up(conn: &DatabaseConnection) -> Result<(), AppError> {
    migrate(conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("schema migration failed: {e}")))
}

/// Connect and bring the schema up to date.
///
/// Migrations run with the owner role; the returned pool uses the app role.
/// In-memory SQLite migrates on the returned pool itself since a second pool
/// would see an empty database.
pub async fn bootstrap_db(runtime: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    if kind == DbKind::SqliteMemory {
        let conn = connect_db(runtime, kind, DbOwner::App).await?;
        migrate_up(&conn).await?;
        return Ok(conn);
    }

    let owner = connect_db(runtime, kind, DbOwner::Owner).await?;
    migrate_up(&owner).await?;
    if let Err(e) = owner.close().await {
        warn!(error = %e, "closing migration pool failed");
    }
    connect_db(runtime, kind, DbOwner::App).await
}
