use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ApiResponse;
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Failure rendered as a `success=false` envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self { Self::new(StatusCode::BAD_REQUEST, message) }

    pub fn unauthorized(message: impl Into<String>) -> Self { Self::new(StatusCode::UNAUTHORIZED, message) }

    fn internal(detail: &str) -> Self {
        error!(error = %detail, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::failure(self.message))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        use models::errors::ModelError;
        match e {
            ServiceError::Validation(m) | ServiceError::InvalidState(m) | ServiceError::Conflict(m) => Self::bad_request(m),
            ServiceError::Model(ModelError::Validation(m)) => Self::bad_request(m),
            ServiceError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            ServiceError::Forbidden(m) => Self::new(StatusCode::FORBIDDEN, m),
            ServiceError::Unauthorized(m) => Self::unauthorized(m),
            ServiceError::Db(m) | ServiceError::Model(ModelError::Db(m)) => Self::internal(&m),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(m) | AuthError::Conflict(m) => Self::bad_request(m),
            AuthError::NotFound(m) => Self::new(StatusCode::NOT_FOUND, m),
            AuthError::Unauthorized(m) => Self::unauthorized(m),
            other @ (AuthError::TokenError(_) | AuthError::Repository(_)) => {
                error!(code = other.code(), "auth failure");
                Self::internal(&other.to_string())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database setup failed: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
