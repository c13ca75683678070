use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Extension, Json, Router};
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_sql::schemas::schema::Organization;
use enlace_types::{CreateOrganizationRequest, ORGANIZACIONES_LISTADO};
use std::sync::Arc;
use tracing::info;

pub async fn list_organizations(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Vec<Organization>>, ServerError> {
    state
        .require_section(&session, ORGANIZACIONES_LISTADO)
        .await?;

    let organizations = state.sql_client.list_organizations().await?;

    Ok(Json(organizations))
}

pub async fn create_organization(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), ServerError> {
    state
        .require_section(&session, ORGANIZACIONES_LISTADO)
        .await?;

    if request.name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "organization name cannot be empty".to_string(),
        ));
    }

    let organization = state.sql_client.insert_organization(&request).await?;

    info!(
        "Organization {} created by {}",
        organization.name, session.username
    );

    Ok((StatusCode::CREATED, Json(organization)))
}

pub async fn get_organization_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/organizations", prefix),
        get(list_organizations).post(create_organization),
    )
}
