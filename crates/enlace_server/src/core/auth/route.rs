use crate::core::auth::middleware::ACCESS_TOKEN_COOKIE;
use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::State;
use axum::{routing::post, Extension, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use enlace_auth::schema::SessionContext;
use enlace_error::error::AuthError;
use enlace_sql::base::SqlClient;
use enlace_types::{JwtToken, LoginRequest, LogoutResponse};
use std::sync::Arc;
use tracing::info;

pub async fn api_login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<JwtToken>), ServerError> {
    let user = state
        .sql_client
        .get_user(&request.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    state
        .auth_manager
        .validate_user(&user, &request.password)?;

    let token = state.auth_manager.generate_jwt(&user)?;

    info!("User {} logged in", user.username);

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true);

    Ok((jar.add(cookie), Json(JwtToken { token })))
}

pub async fn api_logout_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    state.sessions.end(&session).await;

    info!(
        "User {} logged out, {} sessions active",
        session.username,
        state.sessions.active_sessions().await
    );

    (
        jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/")),
        Json(LogoutResponse { logged_out: true }),
    )
}

pub async fn get_login_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(&format!("{}/auth/login", prefix), post(api_login_handler))
}

pub async fn get_logout_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(&format!("{}/auth/logout", prefix), post(api_logout_handler))
}
