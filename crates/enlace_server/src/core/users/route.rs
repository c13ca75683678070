use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{
    routing::{get, put},
    Extension, Json, Router,
};
use enlace_auth::auth::hash_password;
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_sql::schemas::schema::UserSummary;
use enlace_types::{AssignRoleRequest, CreateUserRequest, UserIdRequest};
use std::sync::Arc;
use tracing::info;

fn check_role(state: &AppState, role: &str) -> Result<(), ServerError> {
    if !state.role_table.contains(role) {
        return Err(ServerError::BadRequest(format!("unknown role {}", role)));
    }
    Ok(())
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Vec<UserSummary>>, ServerError> {
    state.require_admin(&session).await?;

    let users = state.sql_client.list_users().await?;

    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserSummary>), ServerError> {
    state.require_admin(&session).await?;

    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(ServerError::BadRequest(
            "username and password are required".to_string(),
        ));
    }
    check_role(&state, &request.role)?;

    let password_hash = hash_password(&request.password)?;
    let user = state
        .sql_client
        .insert_user(&request.username, &password_hash, &request.role)
        .await?;

    info!("User {} created by {}", user.username, session.username);

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn assign_role(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<AssignRoleRequest>,
) -> Result<Json<UserSummary>, ServerError> {
    state.require_admin(&session).await?;
    check_role(&state, &request.role)?;

    let user = state
        .sql_client
        .update_user_role(request.user_id, &request.role)
        .await?;

    info!(
        "User {} assigned role {} by {}",
        user.username, user.role, session.username
    );

    Ok(Json(user))
}

pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<UserIdRequest>,
) -> Result<Json<UserSummary>, ServerError> {
    state.require_admin(&session).await?;

    if request.user_id == session.user_id {
        return Err(ServerError::BadRequest(
            "administrators cannot deactivate themselves".to_string(),
        ));
    }

    let user = state
        .sql_client
        .set_user_active(request.user_id, false)
        .await?;

    // resolved gates cache the old permission set
    let ended = state.sessions.end_user_sessions(user.id).await;

    info!(
        "User {} deactivated by {}, {} sessions ended",
        user.username, session.username, ended
    );

    Ok(Json(user))
}

pub async fn restore_user(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<UserIdRequest>,
) -> Result<Json<UserSummary>, ServerError> {
    state.require_admin(&session).await?;

    let user = state
        .sql_client
        .set_user_active(request.user_id, true)
        .await?;

    info!("User {} restored by {}", user.username, session.username);

    Ok(Json(user))
}

pub async fn get_user_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/users", prefix),
            get(list_users).post(create_user),
        )
        .route(&format!("{}/users/role", prefix), put(assign_role))
        .route(&format!("{}/users/deactivate", prefix), put(deactivate_user))
        .route(&format!("{}/users/restore", prefix), put(restore_user))
}
