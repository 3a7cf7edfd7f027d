use sqlx::{Pool, Sqlite};
use crate::db::models::{Idea, IdeaId, UserId};
use crate::db::{classify, validate_text, Violation};
use crate::error::AppError;

pub const MAX_TITLE_CHARS: usize = 100;

pub struct IdeaRepository;

impl IdeaRepository {
    pub async fn create(
        pool: &Pool<Sqlite>,
        title: &str,
        content: &str,
        author_id: UserId,
    ) -> Result<IdeaId, AppError> {
        validate_text("Title", title, Some(MAX_TITLE_CHARS))?;
        validate_text("Content", content, None)?;

        let result = sqlx::query(
            r#"
INSERT INTO idea (title, content, user_id)
VALUES (?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .execute(pool)
        .await
        .map_err(|e| match classify(e) {
            Violation::ForeignKey => AppError::NotFound(format!("No user with id {}", author_id)),
            Violation::Unique(msg) => AppError::Internal(format!("Unexpected uniqueness failure: {}", msg)),
            Violation::Check(msg) => AppError::InvalidInput(msg),
            Violation::Other(e) => AppError::Database(e),
        })?;

        Ok(result.last_insert_rowid())
    }

    /// Every idea, oldest first.
    pub async fn list_all(pool: &Pool<Sqlite>) -> Result<Vec<Idea>, AppError> {
        let ideas = sqlx::query_as::<_, Idea>(
            r#"
SELECT i.id, i.title, i.content, i.user_id, u.username AS author
FROM idea i
JOIN "user" u ON i.user_id = u.id
ORDER BY i.id ASC
            "#
        )
        .fetch_all(pool)
        .await?;

        Ok(ideas)
    }

    pub async fn list_by_author(
        pool: &Pool<Sqlite>,
        author_id: UserId,
    ) -> Result<Vec<Idea>, AppError> {
        let ideas = sqlx::query_as::<_, Idea>(
            r#"
SELECT i.id, i.title, i.content, i.user_id, u.username AS author
FROM idea i
JOIN "user" u ON i.user_id = u.id
WHERE i.user_id = ?
ORDER BY i.id ASC
            "#
        )
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(ideas)
    }

    pub async fn count(pool: &Pool<Sqlite>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM idea")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
