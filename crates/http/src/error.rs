//! Error handling for the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookstore_kernel::CrudError;
use serde::Serialize;
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard error payload for all HTTP errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: Vec<serde_json::Value>,
    pub trace_id: String,
    pub timestamp: String,
}

/// Envelope wrapping [`ErrorBody`] as `{"error": {...}}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(inline)]
    pub error: ErrorBody,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest {
        details: Vec<serde_json::Value>,
        code: String,
        message: String,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::bad_request_with_details(Vec::new(), message)
    }

    /// Create a bad request error carrying per-field details
    pub fn bad_request_with_details(
        details: Vec<serde_json::Value>,
        message: impl Into<String>,
    ) -> Self {
        Self::BadRequest {
            details,
            code: "invalid_argument".to_string(),
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CrudError> for AppError {
    fn from(err: CrudError) -> Self {
        match err {
            e @ CrudError::NotFound { .. } => AppError::not_found(e.to_string()),
            CrudError::InvalidArgument { message, details } => {
                AppError::bad_request_with_details(details, message)
            }
            CrudError::Storage(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        let status = self.status();

        let (code, message, details) = match self {
            AppError::NotFound { message, code } => (code, message, Vec::new()),
            AppError::BadRequest {
                details,
                code,
                message,
            } => (code, message, details),
            AppError::Internal(e) => ("internal_error".to_string(), format!("{e:#}"), Vec::new()),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %code,
                status_code = %status.as_u16(),
                error = %message,
                "Request failed"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %code,
                status_code = %status.as_u16(),
                "Request rejected"
            );
        }

        // Internal details stay in the log for release builds
        let message = if cfg!(not(debug_assertions)) && status == StatusCode::INTERNAL_SERVER_ERROR
        {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                details,
                trace_id: error_id.to_string(),
                timestamp,
            },
        };

        (status, Json(body)).into_response()
    }
}
