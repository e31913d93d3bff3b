//! # HTTP Errors
//!
//! Error codes:
//! - DT_HTTP_UNKNOWN_COLUMN
//! - DT_HTTP_BAD_ADDRESS
//! - DT_HTTP_INTERNAL

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::table::TableError;

/// Result type for HTTP handlers
pub type HttpResult<T> = Result<T, HttpError>;

/// HTTP surface errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// Column not exposed by the table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Bind address could not be parsed
    #[error("Invalid socket address: {0}")]
    BadAddress(String),

    /// Anything the client cannot fix
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::UnknownColumn(_) => StatusCode::NOT_FOUND,
            HttpError::BadAddress(_) | HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            HttpError::UnknownColumn(_) => "DT_HTTP_UNKNOWN_COLUMN",
            HttpError::BadAddress(_) => "DT_HTTP_BAD_ADDRESS",
            HttpError::Internal(_) => "DT_HTTP_INTERNAL",
        }
    }
}

impl<S: std::fmt::Display> From<TableError<S>> for HttpError {
    fn from(err: TableError<S>) -> Self {
        match err {
            TableError::UnknownColumn(name) => HttpError::UnknownColumn(name),
            TableError::Source(source) => HttpError::Internal(source.to_string()),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<HttpError> for ErrorResponse {
    fn from(err: HttpError) -> Self {
        Self {
            code: err.code(),
            error: err.to_string(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
