use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::{routing::get, Extension, Json, Router};
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_sql::schemas::schema::Beneficiary;
use enlace_types::{BeneficiaryQuery, CreateBeneficiaryRequest, PIMCO_BENEFICIARIOS};
use std::sync::Arc;
use tracing::info;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

pub async fn list_beneficiaries(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(mut params): Query<BeneficiaryQuery>,
) -> Result<Json<Vec<Beneficiary>>, ServerError> {
    state.require_section(&session, PIMCO_BENEFICIARIOS).await?;

    params.limit = Some(params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT));

    let beneficiaries = state.sql_client.query_beneficiaries(&params).await?;

    Ok(Json(beneficiaries))
}

pub async fn create_beneficiary(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(request): Json<CreateBeneficiaryRequest>,
) -> Result<(StatusCode, Json<Beneficiary>), ServerError> {
    state.require_section(&session, PIMCO_BENEFICIARIOS).await?;

    if request.full_name.trim().is_empty() || request.program.trim().is_empty() {
        return Err(ServerError::BadRequest(
            "beneficiary name and program are required".to_string(),
        ));
    }

    if request.age.is_some_and(|age| age < 0) {
        return Err(ServerError::BadRequest("age cannot be negative".to_string()));
    }

    let beneficiary = state.sql_client.insert_beneficiary(&request).await?;

    info!(
        "Beneficiary {} enrolled in {} by {}",
        beneficiary.id, beneficiary.program, session.username
    );

    Ok((StatusCode::CREATED, Json(beneficiary)))
}

pub async fn get_beneficiary_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/beneficiaries", prefix),
        get(list_beneficiaries).post(create_beneficiary),
    )
}
