use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{
    routing::{get, put},
    Extension, Json, Router,
};
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_sql::schemas::schema::FormTemplate;
use enlace_types::{
    CreateFormTemplateRequest, FormTemplateQuery, FormTemplateUidRequest,
    ORGANIZACIONES_FORMULARIOS,
};
use enlace_utils::utils::is_valid_uuid4;
use std::sync::Arc;
use tracing::info;

pub async fn list_form_templates(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<FormTemplateQuery>,
) -> Result<Json<Vec<FormTemplate>>, ServerError> {
    state
        .require_section(&session, ORGANIZACIONES_FORMULARIOS)
        .await?;

    let templates = state
        .sql_client
        .list_form_templates(params.include_archived.unwrap_or(false))
        .await?;

    Ok(Json(templates))
}

pub async fn create_form_template(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateFormTemplateRequest>,
) -> Result<(StatusCode, Json<FormTemplate>), ServerError> {
    state
        .require_section(&session, ORGANIZACIONES_FORMULARIOS)
        .await?;

    if request.name.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "form template name cannot be empty".to_string(),
        ));
    }

    if request.fields.is_empty() {
        return Err(ServerError::BadRequest(
            "form template needs at least one field".to_string(),
        ));
    }

    if request.fields.iter().any(|field| field.label.trim().is_empty()) {
        return Err(ServerError::BadRequest(
            "form fields need a label".to_string(),
        ));
    }

    if !state
        .menu
        .section_keys()
        .contains(&request.section_key.as_str())
    {
        return Err(ServerError::BadRequest(format!(
            "unknown section {}",
            request.section_key
        )));
    }

    let template = state.sql_client.insert_form_template(&request).await?;

    info!("Form template {} created by {}", template.uid, session.username);

    Ok((StatusCode::CREATED, Json(template)))
}

async fn set_archived(
    state: &AppState,
    session: &SessionContext,
    uid: &str,
    archived: bool,
) -> Result<Json<FormTemplate>, ServerError> {
    state
        .require_section(session, ORGANIZACIONES_FORMULARIOS)
        .await?;

    // template uids are always v4
    if !is_valid_uuid4(uid).unwrap_or(false) {
        return Err(ServerError::BadRequest(format!(
            "invalid form template uid {}",
            uid
        )));
    }

    let template = state
        .sql_client
        .set_form_template_archived(uid, archived)
        .await?;

    info!(
        "Form template {} {} by {}",
        uid,
        if archived { "archived" } else { "restored" },
        session.username
    );

    Ok(Json(template))
}

pub async fn archive_form_template(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<FormTemplateUidRequest>,
) -> Result<Json<FormTemplate>, ServerError> {
    set_archived(&state, &session, &request.uid, true).await
}

pub async fn restore_form_template(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<FormTemplateUidRequest>,
) -> Result<Json<FormTemplate>, ServerError> {
    set_archived(&state, &session, &request.uid, false).await
}

pub async fn get_form_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/forms", prefix),
            get(list_form_templates).post(create_form_template),
        )
        .route(
            &format!("{}/forms/archive", prefix),
            put(archive_form_template),
        )
        .route(
            &format!("{}/forms/restore", prefix),
            put(restore_form_template),
        )
}
