//! Error handler for converting AppError to HTTP responses.
//!
//! This module implements the IntoResponse trait for AppError so handlers
//! can return `AppResult<T>` directly, and maps axum extractor rejections
//! onto the same envelope.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

impl IntoResponse for AppError {
    /// Converts an AppError into an HTTP response.
    ///
    /// # Status Code Mapping
    /// - NotFound → 404 NOT_FOUND
    /// - Duplicate → 409 CONFLICT
    /// - Validation → 400 BAD_REQUEST
    /// - BadRequest → 400 BAD_REQUEST
    /// - Database → 500 INTERNAL_SERVER_ERROR
    /// - Configuration → 500 INTERNAL_SERVER_ERROR
    /// - ConnectionPool → 503 SERVICE_UNAVAILABLE
    /// - Internal → 500 INTERNAL_SERVER_ERROR
    ///
    /// Internal failure detail stays in the logs; the response body names
    /// the operation at most, never the underlying source error.
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let body = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Duplicate {
                entity,
                field,
                value,
            } => ErrorResponse::duplicate_error(entity, field, value),
            AppError::Validation { field, reason } => {
                ErrorResponse::validation_error(field, reason)
            }
            AppError::BadRequest { message } => ErrorResponse::new("BAD_REQUEST", message),
            AppError::Database { operation, .. } => ErrorResponse::new(
                "DATABASE_ERROR",
                &format!("Database operation failed: {}", operation),
            ),
            AppError::Configuration { key, .. } => {
                ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
            }
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}

/// Maps an axum JSON rejection onto the standard error envelope.
pub fn json_rejection_error(rejection: JsonRejection) -> (StatusCode, ErrorResponse) {
    match rejection {
        JsonRejection::JsonDataError(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_JSON", &err.to_string()),
        ),
        JsonRejection::JsonSyntaxError(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_SYNTAX_ERROR", "JSON syntax error"),
        ),
        JsonRejection::MissingJsonContentType(_) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(
                "MISSING_CONTENT_TYPE",
                "Expected request with Content-Type: application/json",
            ),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("JSON_ERROR", "Failed to parse JSON request"),
        ),
    }
}

/// Maps an axum query-string rejection onto the standard error envelope.
pub fn query_rejection_error(rejection: QueryRejection) -> (StatusCode, ErrorResponse) {
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_QUERY_PARAMS", &err.to_string()),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("QUERY_ERROR", "Invalid query parameters"),
        ),
    }
}

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        let not_found = AppError::not_found("guest", "invitation_id", "missing");
        assert_eq!(error_to_status_code(&not_found), StatusCode::NOT_FOUND);

        let validation = AppError::Validation {
            field: "status".to_string(),
            reason: "status must be confirmed or apologized".to_string(),
        };
        assert_eq!(error_to_status_code(&validation), StatusCode::BAD_REQUEST);

        let pool = AppError::ConnectionPool {
            source: anyhow::anyhow!("pool exhausted"),
        };
        assert_eq!(error_to_status_code(&pool), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_error_code_mapping() {
        let duplicate = AppError::Duplicate {
            entity: "guests".to_string(),
            field: "invitation_id".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(error_to_code(&duplicate), "DUPLICATE_ENTRY");

        let internal = AppError::Internal {
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(error_to_code(&internal), "INTERNAL_ERROR");
    }

    #[test]
    fn test_internal_error_response_hides_source() {
        let error = AppError::Internal {
            source: anyhow::anyhow!("connection string with password"),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let error = AppError::Validation {
            field: "recipient".to_string(),
            reason: "must not be empty".to_string(),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"], "recipient: must not be empty");
    }
}
