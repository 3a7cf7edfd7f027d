use crate::db::{User, UserId};

/// Minimal identity capability shared by everything that can stand in for
/// "the caller".
pub trait Authenticatable {
    fn id(&self) -> Option<UserId>;

    fn is_authenticated(&self) -> bool {
        self.id().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl Authenticatable for SessionState {
    fn id(&self) -> Option<UserId> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(id) => Some(*id),
        }
    }
}

/// Authentication state of one browser for the current request.
///
/// `token` is the persisted session token backing the cookie, present only
/// while authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserSession {
    pub(crate) token: Option<String>,
    pub(crate) state: SessionState,
}

impl BrowserSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub(crate) fn reset(&mut self) {
        self.token = None;
        self.state = SessionState::Anonymous;
    }
}

impl Authenticatable for BrowserSession {
    fn id(&self) -> Option<UserId> {
        self.state.id()
    }
}

/// The caller as resolved against the user table.
#[derive(Debug, Clone)]
pub enum CurrentUser {
    Anonymous,
    User(User),
}

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        match self {
            CurrentUser::Anonymous => None,
            CurrentUser::User(user) => Some(user),
        }
    }
}

impl Authenticatable for CurrentUser {
    fn id(&self) -> Option<UserId> {
        self.user().map(|u| u.id)
    }
}
