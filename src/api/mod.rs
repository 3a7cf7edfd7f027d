pub mod auth;
pub mod flash;
pub mod ideas;
pub mod middleware;
pub mod state;
pub mod views;

pub use state::AppState;

use axum::{
    Router,
    routing::get,
    middleware as axum_middleware,
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    timeout::TimeoutLayer,
};
use std::time::Duration;
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

pub fn create_router(state: AppState) -> Router {
    // Pages that need a logged-in user
    let protected = Router::new()
        .route("/subscribe", get(ideas::subscribe))
        .route("/share", get(ideas::share_page).post(ideas::share))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    // JSON endpoints
    let api = Router::new()
        .route("/api/health", get(health))
        .route("/api/ideas", get(ideas::list_ideas))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(ideas::home))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .merge(protected)
        .merge(api)
        .layer(TimeoutLayer::new(Duration::from_secs(state.config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::db::{test_pool, UserRepository};

    async fn app() -> (Router, AppState) {
        let state = AppState::new(test_pool().await, Arc::new(Config::default()));
        (create_router(state.clone()), state)
    }

    fn form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response<Body>) -> &str {
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    /// `name=value` of the session cookie set by a response.
    fn session_cookie(response: &Response<Body>) -> String {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .find(|v| v.starts_with("idea_session="))
            .and_then(|v| v.split(';').next())
            .unwrap()
            .to_string()
    }

    async fn body_string(response: Response<Body>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn register_and_login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(form("/register", "username=alice&email=a%40x.com&password=pw123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");

        let response = app
            .clone()
            .oneshot(form("/login", "username=alice&password=pw123", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
        session_cookie(&response)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app().await;

        let response = app.oneshot(get("/api/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_anonymous() {
        let (app, _) = app().await;

        for request in [
            get("/subscribe", None),
            get("/share", None),
            form("/share", "title=t&content=c", None),
            get("/share", Some("idea_session=forged")),
        ] {
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/login");
        }
    }

    #[tokio::test]
    async fn test_share_flow() {
        let (app, state) = app().await;
        let cookie = register_and_login(&app).await;

        let response = app.clone().oneshot(get("/share", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(form("/share", "title=Idea1&content=Body1", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let response = app.clone().oneshot(get("/api/ideas", None)).await.unwrap();
        let ideas: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        let alice = UserRepository::find_by_username(&state.db, "alice").await.unwrap();
        assert_eq!(ideas[0]["title"], "Idea1");
        assert_eq!(ideas[0]["user_id"], alice.id);

        let response = app.oneshot(get("/", None)).await.unwrap();
        assert!(body_string(response).await.contains("Idea1"));
    }

    #[tokio::test]
    async fn test_share_rejects_empty_title() {
        let (app, _) = app().await;
        let cookie = register_and_login(&app).await;

        let response = app
            .oneshot(form("/share", "title=&content=Body1", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Title must not be empty"));
    }

    #[tokio::test]
    async fn test_share_rejects_nul_title_as_bad_request() {
        let (app, _) = app().await;
        let cookie = register_and_login(&app).await;

        let response = app
            .clone()
            .oneshot(form("/share", "title=%00x&content=Body1", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(form("/register", "username=%00bob&email=b%40x.com&password=pw", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_subscribe_sets_flag() {
        let (app, state) = app().await;
        let cookie = register_and_login(&app).await;

        let response = app.clone().oneshot(get("/subscribe", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let alice = UserRepository::find_by_username(&state.db, "alice").await.unwrap();
        assert!(alice.subscription_status);

        let with_flash = format!("{}; flash=subscribed", cookie);
        let response = app.oneshot(get("/", Some(&with_flash))).await.unwrap();
        assert!(body_string(response).await.contains("Successfully subscribed!"));
    }

    #[tokio::test]
    async fn test_bad_login_rerenders_form() {
        let (app, _) = app().await;
        register_and_login(&app).await;

        let response = app
            .oneshot(form("/login", "username=alice&password=nope", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert!(body_string(response).await.contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let (app, _) = app().await;
        register_and_login(&app).await;

        let response = app
            .oneshot(form("/register", "username=alice&email=b%40x.com&password=pw", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(body_string(response).await.contains("Username already exists"));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let (app, _) = app().await;
        let cookie = register_and_login(&app).await;

        let response = app.clone().oneshot(get("/logout", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app.oneshot(get("/share", Some(&cookie))).await.unwrap();
        assert_eq!(location(&response), "/login");
    }
}
