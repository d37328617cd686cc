use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Sign in required")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Not Found")]
    NotFound,

    #[error("Remote write failed: {0}")]
    RemoteWriteFailed(String),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationFailed(message.into())
    }

    /// Wraps a failed insert/update/delete against the store.
    pub fn write_failed(err: impl std::fmt::Display) -> Self {
        AppError::RemoteWriteFailed(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::ValidationFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::RemoteWriteFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::OrmError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        AppError::ValidationFailed(format!("invalid fields: {}", fields.join(", ")))
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        // Store errors are not echoed back verbatim.
        let error = match &self {
            AppError::RemoteWriteFailed(_) => "Remote write failed".to_string(),
            _ => self.to_string(),
        };

        let body = ApiResponse::failure(error.clone(), ErrorData { error });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
