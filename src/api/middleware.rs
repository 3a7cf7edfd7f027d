use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::state::AppState;
use crate::auth::{BrowserSession, CurrentUser};
use crate::config::Config;
use crate::error::AppError;

/// Value of the cookie `name`, searching every `Cookie` header.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|h| h.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(config: &Config, token: &str) -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            config.session_cookie_name,
            token,
            config.session_expiry_hours * 3600,
        ),
    )
}

pub fn clear_session_cookie(config: &Config) -> (header::HeaderName, String) {
    (
        header::SET_COOKIE,
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            config.session_cookie_name,
        ),
    )
}

/// Every handler can ask for the caller's session; a missing, unknown or
/// expired cookie yields an anonymous one.
#[axum::async_trait]
impl FromRequestParts<AppState> for BrowserSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = read_cookie(&parts.headers, &state.config.session_cookie_name);
        state.auth.resume(token.as_deref()).await
    }
}

/// Authentication gate for protected pages - anonymous callers are sent to
/// the login form, everyone else gets their `User` in request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    session: BrowserSession,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if state.auth.require_authenticated(&session).is_err() {
        return Ok(Redirect::to("/login").into_response());
    }

    match state.auth.current_user(&session).await? {
        CurrentUser::User(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        CurrentUser::Anonymous => Ok(Redirect::to("/login").into_response()),
    }
}
