use crate::core::router::create_router;
use crate::core::setup::setup_state;
use crate::core::state::AppState;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use enlace_auth::auth::hash_password;
use enlace_settings::config::EnlaceConfig;
use enlace_sql::base::SqlClient;
use enlace_types::RequiresDataPolicy;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin-password";

pub struct TestHelper {
    pub app: Router,
    pub state: Arc<AppState>,
}

impl TestHelper {
    pub async fn new() -> Self {
        Self::with_policy(RequiresDataPolicy::Show).await
    }

    pub async fn with_policy(policy: RequiresDataPolicy) -> Self {
        let config = EnlaceConfig {
            database_uri: "sqlite::memory:".to_string(),
            max_connections: 1,
            jwt_secret: "enlace-test-secret".to_string(),
            jwt_expiry_minutes: 5,
            admin_username: Some(ADMIN_USERNAME.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            menu_path: None,
            requires_data_policy: policy,
            ..Default::default()
        };

        let state = Arc::new(setup_state(config).await.unwrap());
        let app = create_router(state.clone()).await;

        Self { app, state }
    }

    pub async fn create_user(&self, username: &str, password: &str, role: &str) -> i64 {
        let password_hash = hash_password(password).unwrap();
        self.state
            .sql_client
            .insert_user(username, &password_hash, role)
            .await
            .unwrap()
            .id
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
        };

        (status, body)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(request(
                Method::POST,
                "/enlace/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            ))
            .await;

        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, Some(token), None)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, Some(token), Some(body)))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, Some(token), Some(body)))
            .await
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
