use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use super::json_response;
use crate::core::CalcError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Client-facing failures. Every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Well-formed input describing a scenario that cannot be computed (400).
    #[error("{0}")]
    BadRequest(String),

    /// Field out of range (422).
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Body could not be read as the expected JSON document.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected { status, .. } => *status,
        }
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        if err.is_domain_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            ApiError::Validation(err.to_string())
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        json_response(
            status,
            ErrorResponse {
                error: self.to_string(),
            },
        )
    }
}
