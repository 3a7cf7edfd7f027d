pub mod models;
pub mod users;
pub mod sessions;
pub mod ideas;

pub use models::{Idea, IdeaId, Session, User, UserId};
pub use users::UserRepository;
pub use sessions::SessionRepository;
pub use ideas::IdeaRepository;

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::Config;
use crate::error::AppError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the connection pool and bring the schema up to date.
pub async fn connect(config: &Config) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await?;

    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

/// Inspect a failed write for the constraint it tripped.
pub(crate) enum Violation {
    Unique(String),
    ForeignKey,
    Check(String),
    Other(sqlx::Error),
}

pub(crate) fn classify(err: sqlx::Error) -> Violation {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return Violation::Unique(db_err.message().to_string());
        }
        if db_err.is_foreign_key_violation() {
            return Violation::ForeignKey;
        }
        if db_err.is_check_violation() {
            return Violation::Check(db_err.message().to_string());
        }
    }
    Violation::Other(err)
}

/// Reject text the store would refuse or silently accept past its limit.
///
/// SQLite's `length()` stops at the first NUL, so those are refused here
/// rather than surfacing as a CHECK failure.
pub(crate) fn validate_text(field: &str, value: &str, max_chars: Option<usize>) -> Result<(), AppError> {
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} must not be empty", field)));
    }
    if value.contains('\0') {
        return Err(AppError::InvalidInput(format!("{} must not contain NUL characters", field)));
    }
    if let Some(max) = max_chars {
        if value.chars().count() > max {
            return Err(AppError::InvalidInput(format!("{} must be at most {} characters", field, max)));
        }
    }
    Ok(())
}

/// Single-connection in-memory database with migrations applied.
#[cfg(test)]
pub(crate) async fn test_pool() -> Pool<Sqlite> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    MIGRATOR.run(&pool).await.unwrap();
    pool
}

/// Register a user with a throwaway hash, returning its id.
#[cfg(test)]
pub(crate) async fn seed_user(pool: &Pool<Sqlite>, username: &str) -> UserId {
    UserRepository::create(pool, username, &format!("{}@x.com", username), "$argon2id$fake")
        .await
        .unwrap()
}
