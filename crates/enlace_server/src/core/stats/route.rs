use crate::core::error::ServerError;
use crate::core::state::AppState;
use crate::core::stats::summary::summarize;
use axum::extract::State;
use axum::{routing::get, Extension, Json, Router};
use enlace_auth::schema::SessionContext;
use enlace_sql::base::SqlClient;
use enlace_types::{BeneficiaryQuery, CommunityStatsResponse, PIMCO_ESTADISTICA};
use std::sync::Arc;

pub async fn get_community_stats(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<CommunityStatsResponse>, ServerError> {
    state.require_section(&session, PIMCO_ESTADISTICA).await?;

    let communities = state.sql_client.list_communities().await?;
    let beneficiaries = state
        .sql_client
        .query_beneficiaries(&BeneficiaryQuery::default())
        .await?;
    let volunteers = state.sql_client.list_volunteers(None).await?;

    Ok(Json(summarize(&communities, &beneficiaries, &volunteers)))
}

pub async fn get_stats_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("{}/stats/communities", prefix),
        get(get_community_stats),
    )
}
