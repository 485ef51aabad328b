use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Transport-level failure, already mapped to a response class.
#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    Internal(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(_) => Self::NotFound(err.to_string()),
            AppError::Domain(_) => Self::Validation(err.to_string()),
            AppError::Repository(inner) => {
                tracing::error!(error = %inner, "unhandled repository error");
                Self::Internal("An unexpected error occurred".into())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, "Validation Error", message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, "Not Found", message),
            Self::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", message)
            }
        };
        (status, Json(ErrorBody { error: error.into(), message })).into_response()
    }
}
