use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use enlace_error::error::{AuthError, SqlError};
use enlace_types::{ApiErrorBody, NavigationResponse};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Access to section {0} is not permitted")]
    Forbidden(String),

    #[error("Permissions for this session are still loading")]
    Loading,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Sql(#[from] SqlError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::Loading => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Sql(SqlError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Sql(SqlError::InvalidReference(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Sql(SqlError::Conflict(_)) => StatusCode::CONFLICT,
            ServerError::Auth(
                AuthError::InvalidCredentials
                | AuthError::InactiveUser(_)
                | AuthError::InvalidToken(_),
            ) => StatusCode::UNAUTHORIZED,
            ServerError::Sql(_) | ServerError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ServerError::Unauthorized(_) | ServerError::Auth(_) => "unauthorized",
            ServerError::Forbidden(_) => "forbidden",
            ServerError::Loading => "loading",
            ServerError::BadRequest(_) => "bad_request",
            ServerError::Sql(SqlError::NotFound(_)) => "not_found",
            ServerError::Sql(SqlError::InvalidReference(_)) => "invalid_reference",
            ServerError::Sql(SqlError::Conflict(_)) => "conflict",
            ServerError::Sql(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // a loading session gets the same placeholder the navigation returns
        if let ServerError::Loading = self {
            return (status, Json(NavigationResponse::Loading)).into_response();
        }

        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            warn!("Request rejected: {}", self);
            self.to_string()
        };

        let body = ApiErrorBody {
            error: if status.is_server_error() {
                "internal_error".to_string()
            } else {
                self.kind().to_string()
            },
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServerError::Forbidden("voluntarios".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ServerError::Loading.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServerError::from(SqlError::NotFound("user 9".to_string())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServerError::from(SqlError::Conflict("username".to_string())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(SqlError::InvalidReference("community".to_string())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ServerError::from(SqlError::QueryError("boom".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServerError::from(AuthError::InactiveUser("ana".to_string())).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::from(AuthError::HashError("bad".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
