/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers should return `Result<T, ApiError>` which automatically
/// converts to appropriate HTTP status codes.
///
/// # Taxonomy
///
/// - `NotFound` (404): missing board/list/card/user/label; always reported
///   before access is evaluated, so missing resources read the same for
///   everyone
/// - `Unauthorized` (401): missing or invalid credentials
/// - `Forbidden` (403): the caller lacks the creator/member role the
///   operation requires
/// - `BadRequest` (400): malformed input, idempotency violations
///   ("already a member", "label already attached")
/// - `InvalidDestination` (400, code `invalid_destination`): cross-board
///   card move attempt
/// - `Conflict` (409): a concurrent renumber won; reload and retry
/// - `ValidationError` (422): per-field request validation failures
/// - `InternalError` (500): unexpected persistence failures, logged with
///   context, details not exposed to clients

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401) - missing or invalid credentials
    Unauthorized(String),

    /// Forbidden (403) - caller lacks the required board role
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Cross-board card move attempt (400, `invalid_destination`)
    InvalidDestination(String),

    /// Conflict (409) - concurrent renumber or duplicate row
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
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
    /// Error code (e.g., "not_found", "invalid_destination")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidDestination(msg) => write!(f, "Invalid destination: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::InvalidDestination(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_destination", msg, None)
            }
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

/// Converts validator's per-field errors into an ApiError
pub fn validation_errors(e: validator::ValidationErrors) -> ApiError {
    let errors: Vec<ValidationErrorDetail> = e
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

    ApiError::ValidationError(errors)
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique violations surface as conflicts; handlers that can
                // name the duplicate pre-check and return BadRequest instead
                if db_err.constraint().is_some() {
                    return ApiError::Conflict(format!(
                        "Constraint violation: {}",
                        db_err.constraint().unwrap_or("unknown")
                    ));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert access-control errors to API errors
impl From<corkboard_shared::auth::authorization::AccessError> for ApiError {
    fn from(err: corkboard_shared::auth::authorization::AccessError) -> Self {
        match err {
            corkboard_shared::auth::authorization::AccessError::Forbidden(_) => {
                ApiError::Forbidden("Not authorized to access this board".to_string())
            }
            corkboard_shared::auth::authorization::AccessError::Database(e) => {
                ApiError::InternalError(format!("Database error: {}", e))
            }
        }
    }
}

/// Convert reorder-engine errors to API errors
impl From<corkboard_shared::ordering::engine::OrderingError> for ApiError {
    fn from(err: corkboard_shared::ordering::engine::OrderingError) -> Self {
        use corkboard_shared::ordering::engine::OrderingError;

        match err {
            OrderingError::BoardNotFound => ApiError::NotFound("Board not found".to_string()),
            OrderingError::ListNotFound => ApiError::NotFound("List not found".to_string()),
            OrderingError::CardNotFound => ApiError::NotFound("Card not found".to_string()),
            OrderingError::InvalidDestination => ApiError::InvalidDestination(
                "Destination list belongs to a different board".to_string(),
            ),
            OrderingError::Conflict => ApiError::Conflict(
                "The board changed while the move was in flight; reload and retry".to_string(),
            ),
            OrderingError::Database(e) => {
                ApiError::InternalError(format!("Database error: {}", e))
            }
        }
    }
}

/// Convert identity-resolution errors to API errors
impl From<corkboard_shared::auth::middleware::AuthError> for ApiError {
    fn from(err: corkboard_shared::auth::middleware::AuthError) -> Self {
        use corkboard_shared::auth::middleware::AuthError;

        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::BadRequest(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::UnknownUser(_) => ApiError::Unauthorized("Unknown user".to_string()),
            AuthError::DatabaseError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert webhook verification errors to API errors
impl From<corkboard_shared::auth::webhook::WebhookError> for ApiError {
    fn from(err: corkboard_shared::auth::webhook::WebhookError) -> Self {
        use corkboard_shared::auth::webhook::WebhookError;

        match err {
            WebhookError::MissingSignature | WebhookError::MalformedSignature => {
                ApiError::BadRequest(err.to_string())
            }
            WebhookError::StaleTimestamp | WebhookError::InvalidSignature => {
                ApiError::Unauthorized(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Board not found".to_string());
        assert_eq!(err.to_string(), "Not found: Board not found");

        let err = ApiError::InvalidDestination("cross-board".to_string());
        assert_eq!(err.to_string(), "Invalid destination: cross-board");
    }

    #[test]
    fn test_validation_error() {
        let errors = vec![
            ValidationErrorDetail {
                field: "name".to_string(),
                message: "Name must be 1-255 characters".to_string(),
            },
            ValidationErrorDetail {
                field: "color".to_string(),
                message: "Color must be #rrggbb".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }
}
