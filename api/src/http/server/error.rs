use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use revconnect_core::CoreError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error")]
    InternalServerError,

    #[error("Startup error: {msg}")]
    StartupError { msg: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error_code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::InternalServerError | ApiError::StartupError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Core(error) => match error {
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::Authentication(_) => StatusCode::UNAUTHORIZED,
                CoreError::ServiceUnavailable(_) | CoreError::Unhealthy => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                CoreError::DatabaseError { .. } | CoreError::PasswordHash { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "E_UNAUTHORIZED",
            ApiError::Forbidden => "E_FORBIDDEN",
            ApiError::InternalServerError | ApiError::StartupError { .. } => "E_INTERNAL",
            ApiError::Core(error) => error.error_code(),
        }
    }

    fn public_message(&self) -> String {
        match self {
            // Internals stay in the logs.
            ApiError::Core(CoreError::DatabaseError { .. })
            | ApiError::Core(CoreError::PasswordHash { .. })
            | ApiError::StartupError { .. } => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error_code: self.error_code().to_string(),
            message: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}
