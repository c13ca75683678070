use crate::core::error::ServerError;
use crate::core::state::AppState;
use axum::extract::{Query, State};
use axum::{routing::get, Extension, Json, Router};
use enlace_auth::permission::PermissionSet;
use enlace_auth::schema::SessionContext;
use enlace_error::error::SqlError;
use enlace_nav::gate::GateView;
use enlace_nav::prune::active_section;
use enlace_sql::base::{SectionDataset, SqlClient};
use enlace_types::{
    NavigationQuery, NavigationResponse, PermissionsResponse, RequiresDataPolicy, SectionAccess,
    SectionDataResponse, SectionKey,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Data availability of every `requires_data` section the caller can see.
/// Sections without a backing dataset count as having data.
pub async fn section_data(
    state: &AppState,
    permissions: &PermissionSet,
) -> Result<BTreeMap<SectionKey, bool>, SqlError> {
    let mut sections = BTreeMap::new();

    for key in state.menu.requires_data_keys() {
        if !permissions.can_view_section(key.as_str()) {
            continue;
        }

        let has_data = match SectionDataset::for_section(key.as_str()) {
            Some(dataset) => state.sql_client.count_rows(&dataset).await? > 0,
            None => true,
        };
        sections.insert(key.clone(), has_data);
    }

    Ok(sections)
}

pub async fn get_navigation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(params): Query<NavigationQuery>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let Some(permissions) = state.permissions(&session).await else {
        return Ok(Json(NavigationResponse::Loading));
    };

    let policy = state.config.requires_data_policy;
    let data = match policy {
        RequiresDataPolicy::Show => BTreeMap::new(),
        RequiresDataPolicy::Disable | RequiresDataPolicy::Hide => {
            section_data(&state, &permissions).await?
        }
    };

    let view = state
        .sessions
        .render(&session.session_id, &state.menu, policy, &data)
        .await;

    let response = match view {
        GateView::Loading => NavigationResponse::Loading,
        GateView::Ready(items) => {
            let active_section = active_section(&items, params.active.as_deref());
            NavigationResponse::Ready {
                items,
                active_section,
                is_admin: permissions.is_admin(),
            }
        }
    };

    Ok(Json(response))
}

pub async fn get_permissions(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Json<PermissionsResponse> {
    let Some(permissions) = state.permissions(&session).await else {
        return Json(PermissionsResponse::Loading);
    };

    let sections = if permissions.is_admin() {
        state
            .menu
            .section_keys()
            .into_iter()
            .map(SectionKey::from)
            .collect()
    } else {
        permissions.sections()
    };

    Json(PermissionsResponse::Ready {
        role: permissions.role().to_string(),
        sections,
        is_admin: permissions.is_admin(),
    })
}

pub async fn get_section_data(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<SectionDataResponse>, ServerError> {
    let permissions = state
        .permissions(&session)
        .await
        .ok_or(ServerError::Loading)?;

    let sections = section_data(&state, &permissions).await?;

    Ok(Json(SectionDataResponse { sections }))
}

pub async fn get_navigation_router(prefix: &str) -> Router<Arc<AppState>> {
    Router::new()
        .route(&format!("{}/navigation", prefix), get(get_navigation))
        .route(&format!("{}/permissions", prefix), get(get_permissions))
        .route(&format!("{}/sections/data", prefix), get(get_section_data))
}
