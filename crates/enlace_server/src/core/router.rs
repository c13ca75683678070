use crate::core::auth::middleware::auth_api_middleware;
use crate::core::auth::route::{get_login_router, get_logout_router};
use crate::core::beneficiaries::route::get_beneficiary_router;
use crate::core::communities::route::get_community_router;
use crate::core::forms::route::get_form_router;
use crate::core::health::route::get_health_router;
use crate::core::navigation::route::get_navigation_router;
use crate::core::organizations::route::get_organization_router;
use crate::core::state::AppState;
use crate::core::stats::route::get_stats_router;
use crate::core::users::route::get_user_router;
use crate::core::volunteers::route::get_volunteer_router;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub const ROUTE_PREFIX: &str = "/enlace";

pub async fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::PUT,
            Method::DELETE,
            Method::POST,
            Method::PATCH,
        ])
        .allow_credentials(true)
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE]);

    let public_routes = Router::new()
        .merge(get_health_router(ROUTE_PREFIX).await)
        .merge(get_login_router(ROUTE_PREFIX).await);

    let protected_routes = Router::new()
        .merge(get_logout_router(ROUTE_PREFIX).await)
        .merge(get_navigation_router(ROUTE_PREFIX).await)
        .merge(get_community_router(ROUTE_PREFIX).await)
        .merge(get_beneficiary_router(ROUTE_PREFIX).await)
        .merge(get_volunteer_router(ROUTE_PREFIX).await)
        .merge(get_organization_router(ROUTE_PREFIX).await)
        .merge(get_form_router(ROUTE_PREFIX).await)
        .merge(get_user_router(ROUTE_PREFIX).await)
        .merge(get_stats_router(ROUTE_PREFIX).await)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_api_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
        .layer(cors)
}
