use sqlx::{Pool, Sqlite};
use crate::db::models::{User, UserId};
use crate::db::{classify, validate_text, Violation};
use crate::error::AppError;

pub const MAX_USERNAME_CHARS: usize = 80;
pub const MAX_EMAIL_CHARS: usize = 120;

pub struct UserRepository;

impl UserRepository {
    /// Insert a new user. Uniqueness of username and email is enforced by the
    /// table constraints, so a concurrent duplicate also comes back as `Conflict`.
    pub async fn create(
        pool: &Pool<Sqlite>,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, AppError> {
        validate_text("Username", username, Some(MAX_USERNAME_CHARS))?;
        validate_text("Email", email, Some(MAX_EMAIL_CHARS))?;

        let result = sqlx::query(
            r#"
INSERT INTO "user" (username, email, password_hash, subscription_status)
VALUES (?, ?, ?, FALSE)
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .execute(pool)
        .await
        .map_err(|e| match classify(e) {
            Violation::Unique(msg) if msg.contains("email") => {
                AppError::Conflict("Email already registered".to_string())
            }
            Violation::Unique(_) => AppError::Conflict("Username already exists".to_string()),
            Violation::ForeignKey => AppError::Internal("Unexpected foreign key failure".to_string()),
            Violation::Check(msg) => AppError::InvalidInput(msg),
            Violation::Other(e) => AppError::Database(e),
        })?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_username(
        pool: &Pool<Sqlite>,
        username: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE username = ?"#)
            .bind(username)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user named {}", username)))
    }

    pub async fn find_by_id(
        pool: &Pool<Sqlite>,
        id: UserId,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = ?"#)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user with id {}", id)))
    }

    /// Mark the user as subscribed. Calling it again is a no-op.
    pub async fn set_subscribed(
        pool: &Pool<Sqlite>,
        id: UserId,
    ) -> Result<(), AppError> {
        let result = sqlx::query(r#"UPDATE "user" SET subscription_status = TRUE WHERE id = ?"#)
            .bind(id)
            .execute(pool)
            .await?;

        // SQLite counts matched rows, so an already-subscribed user still reports 1.
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("No user with id {}", id)));
        }

        Ok(())
    }
}
