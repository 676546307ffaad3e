//! Core notification provider trait and types.
//!
//! This module provides the abstraction for notification providers,
//! allowing easy extension to support different notification channels.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::ChannelKind;

/// A single message handed to the relay for delivery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendRequest {
    /// Channel the message should travel over
    pub channel: ChannelKind,
    /// Destination address (phone number or device token)
    pub recipient: String,
    /// Message body (required)
    pub body: String,
    /// Message title, used by push notifications
    pub title: Option<String>,
    /// Template identifier for channels that support templated messages
    pub template_id: Option<String>,
    /// Additional provider-specific payload
    pub extra: Option<serde_json::Value>,
}

/// Result of a notification send attempt
///
/// Exactly one of `provider_message_id` and `error_message` is set:
/// the id when the provider accepted the message, the error otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Whether send was successful
    pub success: bool,
    /// Identifier assigned by the provider on acceptance
    pub provider_message_id: Option<String>,
    /// Error description on failure
    pub error_message: Option<String>,
}

impl SendResult {
    pub fn accepted(message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            provider_message_id: Some(message_id.into()),
            error_message: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            provider_message_id: None,
            error_message: Some(error.into()),
        }
    }
}

/// Decoded provider API response
///
/// Every provider reduces its wire format to this enum, so the relay
/// never inspects raw provider payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    /// Provider accepted the message and assigned it an id
    Accepted { message_id: String },
    /// Provider rejected the message
    Rejected { message: String },
}

impl From<ParsedResponse> for SendResult {
    fn from(parsed: ParsedResponse) -> Self {
        match parsed {
            ParsedResponse::Accepted { message_id } => SendResult::accepted(message_id),
            ParsedResponse::Rejected { message } => SendResult::failure(message),
        }
    }
}

/// Outcome of a provider connectivity check
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionCheck {
    /// Whether the provider accepted the credentials
    pub success: bool,
    /// Sender identity confirmed by the provider, e.g. the WhatsApp
    /// display phone number
    pub sender: Option<String>,
    /// Error description on failure
    pub error_message: Option<String>,
}

impl ConnectionCheck {
    pub fn ok() -> Self {
        Self {
            success: true,
            sender: None,
            error_message: None,
        }
    }

    pub fn ok_with_sender(sender: impl Into<String>) -> Self {
        Self {
            success: true,
            sender: Some(sender.into()),
            error_message: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            sender: None,
            error_message: Some(error.into()),
        }
    }
}

/// Failures raised before a request reaches any provider
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// Request failed local checks
    #[error("{0}")]
    Validation(String),

    /// No provider is registered for the requested channel
    #[error("unsupported channel: {0}")]
    UnsupportedChannel(String),
}

/// Fallback error text for a non-success HTTP status whose body carried
/// no usable error message.
pub fn http_error_fallback(status: reqwest::StatusCode) -> String {
    format!(
        "HTTP {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

/// Extracts a message id that providers encode as either a JSON string
/// or a number.
pub(crate) fn json_id_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Trait for notification providers (SMS, WhatsApp, push)
///
/// Uses `async_trait` to support async methods with dynamic dispatch.
/// All providers must be Send + Sync for use in async contexts.
///
/// Provider and transport failures are reported through the returned
/// [`SendResult`], never as an `Err`, so one failed message can not
/// abort a batch and every attempt reaches the delivery log.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Returns the provider name for logging and the delivery log
    ///
    /// # Returns
    /// Static string identifying the provider (e.g., "bulksms", "whatsapp")
    fn name(&self) -> &'static str;

    /// Channel this provider serves
    fn channel(&self) -> ChannelKind;

    /// Sender identity configured for this provider, if any
    fn sender(&self) -> Option<&str> {
        None
    }

    /// Sends a notification message
    ///
    /// # Arguments
    /// * `request` - The message to send, already validated by the relay
    async fn send(&self, request: &SendRequest) -> SendResult;

    /// Verifies credentials and connectivity against the provider API
    async fn test_connection(&self) -> ConnectionCheck;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_result_has_id_and_no_error() {
        let result = SendResult::accepted("msg-42");
        assert!(result.success);
        assert_eq!(result.provider_message_id.as_deref(), Some("msg-42"));
        assert!(result.error_message.is_none());
    }

    #[test]
    fn failure_result_has_error_and_no_id() {
        let result = SendResult::failure("boom");
        assert!(!result.success);
        assert!(result.provider_message_id.is_none());
        assert_eq!(result.error_message.as_deref(), Some("boom"));
    }

    #[test]
    fn parsed_response_converts_to_result() {
        let accepted: SendResult = ParsedResponse::Accepted {
            message_id: "abc".to_string(),
        }
        .into();
        assert_eq!(accepted, SendResult::accepted("abc"));

        let rejected: SendResult = ParsedResponse::Rejected {
            message: "no balance".to_string(),
        }
        .into();
        assert_eq!(rejected, SendResult::failure("no balance"));
    }

    #[test]
    fn http_fallback_includes_code_and_reason() {
        assert_eq!(
            http_error_fallback(reqwest::StatusCode::UNAUTHORIZED),
            "HTTP 401: Unauthorized"
        );
    }

    #[test]
    fn unsupported_channel_error_names_the_channel() {
        let err = SendError::UnsupportedChannel("push".to_string());
        assert_eq!(err.to_string(), "unsupported channel: push");
    }
}
