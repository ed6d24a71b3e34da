use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::envelope::{ApiResponse, ErrorDetail};
use crate::db::StoreError;
use crate::services::validation::FieldError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid {0} ID")]
    InvalidIdentifier(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidIdentifier(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            AppError::Validation(errors) => {
                tracing::debug!(?errors, "Request failed validation");
                let body = ApiResponse::<()>::failure("Validation failed").with_errors(errors);
                (status, Json(body)).into_response()
            }
            AppError::Store(_) | AppError::Internal(_) => {
                let detail = match &self {
                    AppError::Internal(e) => format!("{:#}", e),
                    other => other.to_string(),
                };
                tracing::error!(error = %detail, "Request failed with internal error");

                let body = ApiResponse::<()>::failure("Internal server error");
                let mut response = (status, Json(body)).into_response();
                // Only surfaced to callers in development, see api::middleware::error_detail
                response.extensions_mut().insert(ErrorDetail(detail));
                response
            }
            other => {
                let body = ApiResponse::<()>::failure(other.to_string());
                (status, Json(body)).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
