use axum::{
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::api::flash::{self, Flash};
use crate::api::middleware::{clear_session_cookie, session_cookie};
use crate::api::state::AppState;
use crate::api::views;
use crate::auth::BrowserSession;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET /register
pub async fn register_page() -> Html<String> {
    Html(views::register(None))
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();
    let email = form.email.trim();

    match state.auth.register(username, email, &form.password).await {
        Ok(_) => Ok((
            [(axum::http::header::SET_COOKIE, Flash::Registered.set_cookie())],
            Redirect::to("/login"),
        )
            .into_response()),
        Err(e @ (AppError::InvalidInput(_) | AppError::Conflict(_))) => {
            tracing::debug!("registration rejected: {}", e);
            Ok((e.status(), Html(views::register(Some(&e.user_message())))).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /login
pub async fn login_page(headers: HeaderMap) -> Response {
    let notice = flash::take_flash(&headers);
    let page = Html(views::login(None, notice));

    match notice {
        Some(_) => ([flash::clear_cookie()], page).into_response(),
        None => page.into_response(),
    }
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    mut session: BrowserSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.auth.login(&mut session, form.username.trim(), &form.password).await {
        Ok(_) => {
            let token = session
                .token()
                .ok_or_else(|| AppError::Internal("Login produced no session token".to_string()))?;

            Ok(([session_cookie(&state.config, token)], Redirect::to("/")).into_response())
        }
        Err(e @ AppError::Unauthorized(_)) => {
            Ok((e.status(), Html(views::login(Some(&e.user_message()), None))).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    mut session: BrowserSession,
) -> Result<Response, AppError> {
    state.auth.logout(&mut session).await?;

    Ok((
        AppendHeaders([
            clear_session_cookie(&state.config),
            (axum::http::header::SET_COOKIE, Flash::LoggedOut.set_cookie()),
        ]),
        Redirect::to("/"),
    )
        .into_response())
}
