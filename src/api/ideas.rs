use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde::Deserialize;

use crate::api::flash::{self, Flash};
use crate::api::state::AppState;
use crate::api::views;
use crate::auth::BrowserSession;
use crate::db::{Idea, IdeaRepository, User, UserRepository};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ShareForm {
    pub title: String,
    pub content: String,
}

/// GET /
pub async fn home(
    State(state): State<AppState>,
    session: BrowserSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let current = state.auth.current_user(&session).await?;
    let ideas = IdeaRepository::list_all(&state.db).await?;
    let notice = flash::take_flash(&headers);

    let page = Html(views::home(&ideas, current.user(), notice));
    match notice {
        Some(_) => Ok(([flash::clear_cookie()], page).into_response()),
        None => Ok(page.into_response()),
    }
}

/// GET /subscribe (requires auth)
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Response, AppError> {
    match UserRepository::set_subscribed(&state.db, user.id).await {
        Ok(()) => {
            tracing::info!(user_id = user.id, "user subscribed");
            Ok((
                [(header::SET_COOKIE, Flash::Subscribed.set_cookie())],
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(AppError::NotFound(_)) => Ok(Redirect::to("/login").into_response()),
        Err(e) => Err(e),
    }
}

/// GET /share (requires auth)
pub async fn share_page(Extension(user): Extension<User>) -> Html<String> {
    Html(views::share(&user, None))
}

/// POST /share (requires auth)
pub async fn share(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(form): Form<ShareForm>,
) -> Result<Response, AppError> {
    let title = form.title.trim();
    let content = form.content.trim();

    match IdeaRepository::create(&state.db, title, content, user.id).await {
        Ok(id) => {
            tracing::info!(user_id = user.id, idea_id = id, "idea shared");
            Ok((
                [(header::SET_COOKIE, Flash::Shared.set_cookie())],
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(e @ AppError::InvalidInput(_)) => {
            Ok((e.status(), Html(views::share(&user, Some(&e.user_message())))).into_response())
        }
        Err(AppError::NotFound(_)) => Ok(Redirect::to("/login").into_response()),
        Err(e) => Err(e),
    }
}

/// GET /api/ideas
pub async fn list_ideas(State(state): State<AppState>) -> Result<Json<Vec<Idea>>, AppError> {
    Ok(Json(IdeaRepository::list_all(&state.db).await?))
}
