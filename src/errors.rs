use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// One violated validation rule: which field, why, and the offending value.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub value: serde_json::Value,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>, value: serde_json::Value) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
            value,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // The db layer reports through anyhow, so rusqlite failures arrive
    // here wrapped rather than as their own variant.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Internal(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "success": false,
                    "message": "Internal server error",
                    "error": e.to_string(),
                }),
            ),
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "success": false,
                    "message": "Validation failed",
                    "errors": errors,
                }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                serde_json::json!({
                    "success": false,
                    "message": format!("{what} not found"),
                }),
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "success": false,
                    "message": message,
                }),
            ),
            AppError::RateLimited(message) => (
                StatusCode::TOO_MANY_REQUESTS,
                serde_json::json!({
                    "success": false,
                    "message": message,
                }),
            ),
            AppError::ServiceUnavailable(error) => (
                StatusCode::SERVICE_UNAVAILABLE,
                serde_json::json!({
                    "success": false,
                    "message": "Service unavailable",
                    "error": error,
                }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
