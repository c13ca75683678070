use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Extension, Json, Router};
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_sql::schemas::schema::Volunteer;
use enlace_types::{CreateVolunteerRequest, VolunteerQuery, VOLUNTARIOS};
use std::sync::Arc;
use tracing::info;

pub async fn list_volunteers(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<VolunteerQuery>,
) -> Result<Json<Vec<Volunteer>>, ServerError> {
    state.require_section(&session, VOLUNTARIOS).await?;

    let volunteers = state.sql_client.list_volunteers(params.active).await?;

    Ok(Json(volunteers))
}

pub async fn create_volunteer(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateVolunteerRequest>,
) -> Result<(StatusCode, Json<Volunteer>), ServerError> {
    state.require_section(&session, VOLUNTARIOS).await?;

    if request.full_name.trim().is_empty() || !request.email.contains('@') {
        return Err(ServerError::BadRequest(
            "volunteer needs a name and a valid email".to_string(),
        ));
    }

    if !request.hours.is_finite() || request.hours < 0.0 {
        return Err(ServerError::BadRequest(
            "volunteer hours cannot be negative".to_string(),
        ));
    }

    let volunteer = state.sql_client.insert_volunteer(&request).await?;

    info!("Volunteer {} registered by {}", volunteer.id, session.username);

    Ok((StatusCode::CREATED, Json(volunteer)))
}

pub async fn get_volunteer_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/volunteers", prefix),
        get(list_volunteers).post(create_volunteer),
    )
}
