use crate::error::AppError;

/// Upper bound on session lifetime (one year).
pub const MAX_SESSION_EXPIRY_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub session_expiry_hours: i64,
    pub session_cookie_name: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            database_url: "sqlite://ideas.db?mode=rwc".to_string(),
            session_expiry_hours: 24,
            session_cookie_name: "idea_session".to_string(),
            db_max_connections: 5,
            db_min_connections: 1,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://ideas.db?mode=rwc".to_string()),
            session_expiry_hours: parse_expiry_hours(
                &std::env::var("SESSION_EXPIRY_HOURS").unwrap_or_else(|_| "24".to_string()),
            )?,
            session_cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "idea_session".to_string()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e)))?,
            db_min_connections: std::env::var("DB_MIN_CONNECTIONS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid DB_MIN_CONNECTIONS: {}", e)))?,
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|e| AppError::Config(format!("Invalid REQUEST_TIMEOUT_SECS: {}", e)))?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_expiry_hours(raw: &str) -> Result<i64, AppError> {
    let hours: i64 = raw
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid SESSION_EXPIRY_HOURS: {}", e)))?;

    if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&hours) {
        return Err(AppError::Config(format!(
            "Invalid SESSION_EXPIRY_HOURS: {} (expected 1..={})",
            hours, MAX_SESSION_EXPIRY_HOURS
        )));
    }

    Ok(hours)
}
