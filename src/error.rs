use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;

/// Request-level failures, rendered as `{"error": {"message": ...}}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("JWT token required")]
    AuthenticationMissing,

    #[error("Invalid JWT token: {0}")]
    InvalidCredential(AuthError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Missing => AppError::AuthenticationMissing,
            other => AppError::InvalidCredential(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorMessage,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AuthenticationMissing | AppError::InvalidCredential(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(e) => error!("Internal error: {:#}", e),
            AppError::Upstream(msg) => error!("Upstream error: {}", msg),
            other => warn!("Request rejected ({}): {}", status, other),
        }

        let body = ErrorBody {
            error: ErrorMessage {
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
