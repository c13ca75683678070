use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Extension, Json, Router};
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_sql::schemas::schema::Community;
use enlace_types::{CreateCommunityRequest, PIMCO_COMUNIDADES};
use std::sync::Arc;
use tracing::info;

pub async fn list_communities(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Vec<Community>>, ServerError> {
    state.require_section(&session, PIMCO_COMUNIDADES).await?;

    let communities = state.sql_client.list_communities().await?;

    Ok(Json(communities))
}

pub async fn create_community(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateCommunityRequest>,
) -> Result<(StatusCode, Json<Community>), ServerError> {
    state.require_section(&session, PIMCO_COMUNIDADES).await?;

    if request.name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "community name cannot be empty".to_string(),
        ));
    }

    let community = state.sql_client.insert_community(&request).await?;

    info!("Community {} created by {}", community.name, session.username);

    Ok((StatusCode::CREATED, Json(community)))
}

pub async fn get_community_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/communities", prefix),
        get(list_communities).post(create_community),
    )
}
