//! Error response DTOs.

use serde::Serialize;
use utoipa::ToSchema;

/// Standard error envelope returned for every non-2xx response.
///
/// Business failures (a provider rejecting a message, a failed connection
/// test) never use this shape; they come back as HTTP 200 with a `success`
/// flag. This envelope is reserved for boundary errors.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Always `false`, mirroring the success flag of 2xx payloads
    pub success: bool,
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error description
    pub error: String,
    /// Request ID for correlation, when one was assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            success: false,
            code: code.to_string(),
            error: message.to_string(),
            request_id: None,
        }
    }

    /// Builds the envelope for a missing resource.
    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "NOT_FOUND",
            &format!("{} with {}={} not found", entity, field, value),
        )
    }

    /// Builds the envelope for a unique constraint conflict.
    pub fn duplicate_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "DUPLICATE_ENTRY",
            &format!("{} with {}='{}' already exists", entity, field, value),
        )
    }

    /// Builds the envelope for a failed field validation.
    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new("VALIDATION_ERROR", &format!("{}: {}", field, reason))
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialization() {
        let body = ErrorResponse::new("BAD_REQUEST", "malformed body");
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"success":false,"code":"BAD_REQUEST","error":"malformed body"}"#
        );
    }

    #[test]
    fn test_request_id_rendered_camel_case() {
        let body = ErrorResponse::new("NOT_FOUND", "gone").with_request_id("req-1");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["requestId"], "req-1");
    }

    #[test]
    fn test_not_found_helper() {
        let body = ErrorResponse::not_found_error("guest", "invitation_id", "abc");
        assert_eq!(body.code, "NOT_FOUND");
        assert_eq!(body.error, "guest with invitation_id=abc not found");
        assert!(!body.success);
    }
}
