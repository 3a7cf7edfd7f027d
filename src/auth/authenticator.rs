use std::sync::LazyLock;

use sqlx::{Pool, Sqlite};

use crate::auth::session::{Authenticatable, BrowserSession, CurrentUser, SessionState};
use crate::crypto::{hash_password, verify_password};
use crate::db::{SessionRepository, User, UserId, UserRepository};
use crate::error::AppError;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Hash checked against when the username is unknown, so both failure paths
/// pay for one Argon2 verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("idea-board-dummy-password").unwrap_or_else(|e| {
        tracing::error!("failed to build dummy password hash: {}", e);
        String::new()
    })
});

/// Moves browser sessions between Anonymous and Authenticated, backed by the
/// session table so the state survives across requests.
#[derive(Clone)]
pub struct Authenticator {
    pool: Pool<Sqlite>,
    expiry_hours: i64,
}

impl Authenticator {
    pub fn new(pool: Pool<Sqlite>, expiry_hours: i64) -> Self {
        Self { pool, expiry_hours }
    }

    /// Hash the password and store a new user.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, AppError> {
        let password_hash = hash_password(password)?;
        let id = UserRepository::create(&self.pool, username, email, &password_hash).await?;

        tracing::info!(user_id = id, "registered user {}", username);
        Ok(id)
    }

    /// Rebuild a session from the cookie token, if any.
    pub async fn resume(&self, token: Option<&str>) -> Result<BrowserSession, AppError> {
        let Some(token) = token else {
            return Ok(BrowserSession::anonymous());
        };

        let session = match SessionRepository::get_by_token(&self.pool, token).await? {
            Some(row) => BrowserSession {
                token: Some(row.token),
                state: SessionState::Authenticated(row.user_id),
            },
            None => BrowserSession::anonymous(),
        };

        Ok(session)
    }

    /// Verify the credentials and, on success, bind the session to the user.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(
        &self,
        session: &mut BrowserSession,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let user = match UserRepository::find_by_username(&self.pool, username).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => {
                verify_password(password, &DUMMY_HASH);
                tracing::warn!("login failed for {}", username);
                return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(e),
        };

        if !verify_password(password, &user.password_hash) {
            tracing::warn!("login failed for {}", username);
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        // Never carry a previous token over into the new identity.
        if let Some(old) = session.token.take() {
            SessionRepository::delete(&self.pool, &old).await?;
        }

        let row = SessionRepository::create(&self.pool, user.id, self.expiry_hours).await?;
        session.token = Some(row.token);
        session.state = SessionState::Authenticated(user.id);

        tracing::info!(user_id = user.id, "user {} logged in", user.username);
        Ok(user)
    }

    /// Always ends Anonymous, whatever the prior state.
    pub async fn logout(&self, session: &mut BrowserSession) -> Result<(), AppError> {
        let token = session.token.take();
        session.reset();

        if let Some(token) = token {
            SessionRepository::delete(&self.pool, &token).await?;
        }

        Ok(())
    }

    pub async fn current_user(&self, session: &BrowserSession) -> Result<CurrentUser, AppError> {
        let Some(id) = session.id() else {
            return Ok(CurrentUser::Anonymous);
        };

        match UserRepository::find_by_id(&self.pool, id).await {
            Ok(user) => Ok(CurrentUser::User(user)),
            Err(AppError::NotFound(_)) => Ok(CurrentUser::Anonymous),
            Err(e) => Err(e),
        }
    }

    pub fn require_authenticated(&self, session: &BrowserSession) -> Result<UserId, AppError> {
        session
            .id()
            .ok_or_else(|| AppError::Unauthorized("Login required".to_string()))
    }
}
