// Error handling module for the Taskhub API
// Provides the single error type every handler returns and its HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All handlers should return Result<T, ApiError>
///
/// Authentication and authorization failures carry fixed client messages so
/// that a response never reveals whether a user or organization exists.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No Authorization header on a protected route
    #[error("Missing authorization header")]
    MissingCredential,

    /// Malformed, expired or wrongly signed bearer token.
    /// The reason is logged, never returned.
    #[error("Invalid or expired token: {0}")]
    Unauthenticated(String),

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// Missing or malformed target organization identifier
    #[error("Invalid organization id: {0}")]
    InvalidTarget(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0} not found")]
    NotFound(String),

    /// Malformed request body; the message is returned verbatim
    #[error("{0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// JSON error body: `{ "error": ... }`, with `message` only on 500s
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging levels:
    /// - error!: internal and database errors (500-level)
    /// - warn!: authentication and authorization failures
    /// - debug!: expected client errors (validation, not found, routing)
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::MissingCredential => {
                warn!("Missing Authorization header");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Missing authorization header"),
                )
            }
            ApiError::Unauthenticated(reason) => {
                warn!("Rejected bearer token: {}", reason);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Invalid or expired token"),
                )
            }
            ApiError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new("Insufficient permissions"),
            ),
            ApiError::InvalidTarget(raw) => {
                debug!("Invalid target organization id: {:?}", raw);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Invalid organization id"),
                )
            }
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("Method not allowed"),
            ),
            ApiError::NotFound(resource) => {
                debug!("{} not found", resource);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(format!("{} not found", resource)),
                )
            }
            ApiError::ValidationError(msg) => {
                debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg.clone()))
            }
            ApiError::InternalError(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_message(
                        "Internal server error",
                        "An unexpected error occurred",
                    ),
                )
            }
            ApiError::DatabaseError(db_error) => {
                // Full detail stays in the server log
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_message(
                        "Internal server error",
                        "A database error occurred",
                    ),
                )
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCredential | ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::InsufficientPermissions => StatusCode::FORBIDDEN,
            ApiError::InvalidTarget(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) | ApiError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Fallback handler attached to every route so that an undeclared method
/// gets a JSON 405 before any extractor runs.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_forbidden_body() {
        let (status, body) = body_json(ApiError::InsufficientPermissions).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, serde_json::json!({ "error": "Insufficient permissions" }));
    }

    #[tokio::test]
    async fn test_unauthenticated_hides_reason() {
        let (status, body) =
            body_json(ApiError::Unauthenticated("ExpiredSignature".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid or expired token");
        assert!(body.get("message").is_none());
        assert!(!body.to_string().contains("ExpiredSignature"));
    }

    #[tokio::test]
    async fn test_database_error_is_generic_500_with_message() {
        let (status, body) = body_json(ApiError::DatabaseError(sqlx::Error::RowNotFound)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "A database error occurred");
    }

    #[tokio::test]
    async fn test_validation_message_is_returned_verbatim() {
        let (status, body) =
            body_json(ApiError::ValidationError("Bad input".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Bad input" }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingCredential.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::NotFound("User".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidTarget(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
