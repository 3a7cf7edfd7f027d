use std::sync::Arc;
use sqlx::{Pool, Sqlite};
use crate::auth::Authenticator;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub auth: Authenticator,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Pool<Sqlite>, config: Arc<Config>) -> Self {
        let auth = Authenticator::new(db.clone(), config.session_expiry_hours);
        Self { db, auth, config }
    }
}
