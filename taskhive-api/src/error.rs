/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts to
/// the appropriate HTTP status code with a JSON body of the form
/// `{"error", "message", "details"?}`.
///
/// Internal errors are logged server-side and surface to clients as a
/// generic message with no detail.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use taskhive_shared::auth::{GuardError, JwtError, PasswordError};
use taskhive_shared::mail::MailError;
use taskhive_shared::store::StoreError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401) - bad credentials, invalid tokens, unconfirmed accounts
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (409) - duplicate email, manager-as-member, cross-parent mismatches
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert storage errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::Duplicate(field) => {
                if field.contains("email") {
                    ApiError::Conflict("Email already registered".to_string())
                } else {
                    ApiError::Conflict(format!("Duplicate value: {field}"))
                }
            }
            StoreError::Backend(msg) => ApiError::InternalError(format!("Storage error: {msg}")),
        }
    }
}

/// Convert authorization guard errors to API errors
impl From<GuardError> for ApiError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::NotManager | GuardError::NotCollaborator | GuardError::NotNoteAuthor => {
                ApiError::Forbidden(err.to_string())
            }
            GuardError::TaskNotInProject | GuardError::NoteNotInTask => {
                ApiError::Conflict(err.to_string())
            }
        }
    }
}

/// Convert session token errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Session expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::Invalid(_) => ApiError::Unauthorized("Invalid session token".to_string()),
            JwtError::MissingSecret | JwtError::Create(_) => {
                ApiError::InternalError(format!("Token signing failed: {err}"))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {err}"))
    }
}

/// Convert mail errors to API errors
impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::InternalError(format!("Mail dispatch failed: {err}"))
    }
}

/// Convert validator errors to API errors, flattened to field/message pairs
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        ApiError::ValidationError(details)
    }
}
