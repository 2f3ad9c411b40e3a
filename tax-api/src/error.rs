//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Every failure leaves the service as `{"error": {"code", "message", "details"?}}`.
//! Store failures are logged and reported without their internal message.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tax_core::{RepositoryError, TaxCalculationError};
use tax_data::TaxFileError;
use thiserror::Error;

/// Value sent in `WWW-Authenticate` with every 401.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"Restricted\"";

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "BAD_REQUEST", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field problems, present only for request validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// One rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Body or upload could not be decoded (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Input decoded but was rejected by a business rule (400).
    #[error("{0}")]
    Validation(String),

    /// One or more request fields failed validation (400, with details).
    #[error("request validation failed")]
    InvalidFields(Vec<FieldError>),

    /// Missing or wrong admin credentials (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Message is logged but not returned to the client (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) | Self::InvalidFields(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let details = match &self {
            Self::InvalidFields(fields) => serde_json::to_value(fields).ok(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            );
        }
        response
    }
}

impl From<TaxCalculationError> for AppError {
    fn from(err: TaxCalculationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TaxFileError> for AppError {
    fn from(err: TaxFileError) -> Self {
        match &err {
            TaxFileError::Parse { .. } => Self::BadRequest(err.to_string()),
            TaxFileError::Empty => Self::Validation(err.to_string()),
        }
    }
}
