use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Which database a process targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    /// Enforces the `_test` suffix on Postgres database names
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    /// Private in-memory database, one per connection pool
    SqliteMemory,
}

impl DbKind {
    /// `DB_KIND`, defaulting to Postgres.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var("DB_KIND") {
            Ok(v) => v.parse(),
            Err(_) => Ok(DbKind::Postgres),
        }
    }

    pub fn is_sqlite(&self) -> bool {
        matches!(self, DbKind::SqliteFile | DbKind::SqliteMemory)
    }
}

impl FromStr for DbKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(AppError::config(format!(
                "DB_KIND must be postgres | sqlite-file | sqlite-memory, got '{other}'"
            ))),
        }
    }
}

/// Connection role: the app role for serving, the owner role for migrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    App,
    Owner,
}

pub fn db_url(runtime: RuntimeEnv, kind: DbKind, owner: DbOwner) -> Result<String, AppError> {
    match kind {
        DbKind::Postgres => postgres_url(runtime, owner),
        DbKind::SqliteFile => {
            let path = env::var("SQLITE_DB_PATH").unwrap_or_else(|_| match runtime {
                RuntimeEnv::Prod => "rewards.sqlite".to_string(),
                RuntimeEnv::Test => "rewards_test.sqlite".to_string(),
            });
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

fn postgres_url(runtime: RuntimeEnv, owner: DbOwner) -> Result<String, AppError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let db_name = db_name(runtime)?;
    let (username, password) = credentials(owner)?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

fn db_name(runtime: RuntimeEnv) -> Result<String, AppError> {
    match runtime {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let name = must_var("TEST_DB")?;
            if !name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test runtime requires a database name ending in '_test', got '{name}'"
                )));
            }
            Ok(name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), AppError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((
            must_var("REWARDS_OWNER_USER")?,
            must_var("REWARDS_OWNER_PASSWORD")?,
        )),
    }
}

pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
