use sqlx::{Pool, Sqlite};
use uuid::Uuid;
use crate::db::models::{Session, UserId};
use crate::error::AppError;

pub struct SessionRepository;

impl SessionRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        user_id: UserId,
        expiry_hours: i64,
    ) -> Result<Session, AppError> {
        let token = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().timestamp();
        let expires_at = created_at + (expiry_hours * 3600);

        let session = sqlx::query_as::<_, Session>(
            r#"
INSERT INTO session (token, user_id, created_at, expires_at)
VALUES (?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(session)
    }

    /// Live session for `token`; expired rows are ignored.
    pub async fn get_by_token(
        pool: &Pool<Sqlite>,
        token: &str,
    ) -> Result<Option<Session>, AppError> {
        let now = chrono::Utc::now().timestamp();

        let session = sqlx::query_as::<_, Session>(
            "SELECT * FROM session WHERE token = ? AND expires_at > ?"
        )
        .bind(token)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    pub async fn delete(
        pool: &Pool<Sqlite>,
        token: &str,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM session WHERE token = ?")
            .bind(token)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Returns the number of rows removed.
    pub async fn cleanup_expired(pool: &Pool<Sqlite>) -> Result<u64, AppError> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query("DELETE FROM session WHERE expires_at <= ?")
            .bind(now)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_user, test_pool};

    #[tokio::test]
    async fn test_create_lookup_delete() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;

        let session = SessionRepository::create(&pool, alice, 24).await.unwrap();
        assert_eq!(session.user_id, alice);
        assert_eq!(session.expires_at - session.created_at, 24 * 3600);

        let found = SessionRepository::get_by_token(&pool, &session.token).await.unwrap();
        assert_eq!(found.map(|s| s.user_id), Some(alice));

        SessionRepository::delete(&pool, &session.token).await.unwrap();
        assert!(SessionRepository::get_by_token(&pool, &session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_ignored_and_cleaned() {
        let pool = test_pool().await;
        let alice = seed_user(&pool, "alice").await;

        let expired = SessionRepository::create(&pool, alice, -1).await.unwrap();
        let live = SessionRepository::create(&pool, alice, 1).await.unwrap();

        assert!(SessionRepository::get_by_token(&pool, &expired.token).await.unwrap().is_none());

        assert_eq!(SessionRepository::cleanup_expired(&pool).await.unwrap(), 1);
        assert!(SessionRepository::get_by_token(&pool, &live.token).await.unwrap().is_some());
    }
}
