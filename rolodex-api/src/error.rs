/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`; every store, auth, or filesystem
/// failure is folded into `ApiError` at the operation boundary via the
/// `From` impls below, so handlers stay a straight line of `?`s.
///
/// # Response shape
///
/// ```json
/// { "error": "Contact not found" }
/// ```
///
/// Validation failures additionally carry the field-level list:
///
/// ```json
/// { "error": "Request validation failed",
///   "details": [{ "field": "name", "message": "Name must be at least 6 characters long" }] }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::upload::UploadError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Field-level validation failure (400)
    Validation(Vec<FieldError>),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - duplicate unique field
    Conflict(String),

    /// Too many requests (429)
    RateLimited { retry_after: u64 },

    /// Internal server error (500); the message stays server-side
    Internal(String),
}

/// One failed validation rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Field-level failures, present on validation errors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::RateLimited { retry_after } => {
                write!(f, "Rate limit exceeded, retry after {}s", retry_after)
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // 429 gets a Retry-After header on top of the JSON body
        if let ApiError::RateLimited { retry_after } = &self {
            let retry_after = *retry_after;
            let body = Json(ErrorResponse {
                error: "Too many requests".to_string(),
                details: None,
            });

            let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();
            if let Ok(value) = axum::http::HeaderValue::from_str(&retry_after.to_string()) {
                response.headers_mut().insert("Retry-After", value);
            }
            return response;
        }

        let (status, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::RateLimited { .. } => unreachable!("handled above"),
            ApiError::Internal(msg) => {
                // Full detail stays in the server logs; clients get an
                // opaque message.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations on the contacts table are the backstop for
/// the pre-write duplicate check: a lost check-then-insert race surfaces as
/// the same 409 the check would have produced.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.starts_with("contacts_") {
                        return ApiError::Conflict("Contact or email already exists".to_string());
                    }
                    if constraint.starts_with("users_") {
                        return ApiError::BadRequest("Email already in use".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert declarative validation failures to the field-level 400 shape
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

/// Convert JWT errors to API errors
impl From<rolodex_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: rolodex_shared::auth::jwt::JwtError) -> Self {
        use rolodex_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
            JwtError::CreateError(msg) => ApiError::Internal(format!("Token creation failed: {}", msg)),
        }
    }
}

/// Convert password errors to API errors
impl From<rolodex_shared::auth::password::PasswordError> for ApiError {
    fn from(err: rolodex_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert file intake errors to API errors
impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::NotAnImage { .. } => {
                ApiError::BadRequest("Only image files are allowed".to_string())
            }
            UploadError::TooLarge => ApiError::BadRequest("File too large".to_string()),
            UploadError::Stream(e) => ApiError::BadRequest(format!("Malformed upload: {}", e)),
            UploadError::Io(e) => ApiError::Internal(format!("Failed to store upload: {}", e)),
        }
    }
}

/// Convert multipart parse errors to API errors
impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ApiError::BadRequest(format!("Malformed multipart request: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Picture is required".to_string());
        assert_eq!(err.to_string(), "Bad request: Picture is required");

        let err = ApiError::NotFound("Contact not found".to_string());
        assert_eq!(err.to_string(), "Not found: Contact not found");
    }

    #[test]
    fn test_validation_error_display() {
        let errors = vec![
            FieldError {
                field: "name".to_string(),
                message: "Name must be at least 6 characters long".to_string(),
            },
            FieldError {
                field: "contact".to_string(),
                message: "Contact must be exactly 9 digits".to_string(),
            },
        ];

        let err = ApiError::Validation(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Validation(vec![]).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = ApiError::RateLimited { retry_after: 30 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "30");
    }

    #[test]
    fn test_upload_error_mapping() {
        let err: ApiError = UploadError::TooLarge.into();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "File too large"));

        let err: ApiError = UploadError::NotAnImage {
            mime: "application/pdf".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "Only image files are allowed"));
    }
}
