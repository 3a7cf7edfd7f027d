use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub type UserId = i64;
pub type IdeaId = i64;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub subscription_status: bool,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub title: String,
    pub content: String,
    pub user_id: UserId,
    pub author: String, // Joined from user table
}

#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: i64,
    pub expires_at: i64,
}
