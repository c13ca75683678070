use crate::core::error::ServerError;
use crate::core::state::AppState;

use axum::http::header;
use axum::response::Response;
use axum::{
    extract::{Request, State},
    middleware::Next,
};
use axum_extra::extract::cookie::CookieJar;
use enlace_auth::schema::SessionContext;
use std::sync::Arc;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Decode the caller's token into a `SessionContext` request extension
pub async fn auth_api_middleware(
    cookie_jar: CookieJar,
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    // get the access token from the cookie or the authorization header
    let access_token = cookie_jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|token| token.to_owned())
                })
        });

    let access_token = access_token
        .ok_or_else(|| ServerError::Unauthorized("No access token provided".to_string()))?;

    // validate the access token (this will also check if the token is expired)
    let claims = state.auth_manager.validate_jwt(&access_token)?;

    if state.sessions.is_ended(&claims.sid).await {
        return Err(ServerError::Unauthorized("Session has ended".to_string()));
    }

    req.extensions_mut().insert(SessionContext::from(claims));

    Ok(next.run(req).await)
}
