//! Request errors and their HTTP rendering.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use grid_processor::GridProcessorError;
use passport_protocol::ExceptionResponse;
use thiserror::Error;

/// Every way a passport request can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A snapshot file, a nested key, or a grid file is absent.
    #[error("{0}")]
    NotFound(String),

    /// A query parameter is malformed or out of range.
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong bearer key while a key is configured.
    #[error("{0}")]
    Unauthorized(String),

    /// Anything else: unreadable JSON, bad grid files, failed tasks.
    #[error("{0}")]
    Processing(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_exception(&self) -> ExceptionResponse {
        let detail = self.to_string();
        match self {
            ApiError::NotFound(_) => ExceptionResponse::not_found(detail),
            ApiError::Validation(_) => ExceptionResponse::validation(detail),
            ApiError::Unauthorized(_) => ExceptionResponse::unauthorized(detail),
            ApiError::Processing(_) => ExceptionResponse::processing_error(detail),
        }
    }

    /// Map a grid failure for `file_name`: a missing file is a 404, the rest
    /// are processing errors carrying the underlying message.
    pub fn from_grid(err: GridProcessorError, file_name: &str) -> Self {
        if err.is_not_found() {
            ApiError::NotFound(format!("data not found: {}", file_name))
        } else {
            ApiError::Processing(format!("processing error: {}", err))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(self.to_exception());

        if matches!(self, ApiError::Unauthorized(_)) {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
