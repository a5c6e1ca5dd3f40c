use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Something went wrong: {0}")]
    ServerError(String),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    message: String,
    status: u16,
    #[serde(rename = "statusText")]
    status_text: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let code = self.error_code();

        let message = Json(ErrorBody {
            ok: false,
            message: self.to_string(),
            status: code.as_u16(),
            status_text: code
                .canonical_reason()
                .expect("canonical reason must be defined")
                .to_string(),
        });

        (code, message).into_response()
    }
}

impl AppError {
    fn error_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::ServerError(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::ServerError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<nutrition_core::NutrientError> for AppError {
    fn from(err: nutrition_core::NutrientError) -> Self {
        AppError::ServerError(err.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Hash(_) => AppError::ServerError(err.to_string()),
            AuthError::Token(_) => AppError::Unauthorized("invalid or expired token".to_string()),
        }
    }
}
