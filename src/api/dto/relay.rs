//! Action-dispatch DTOs for the notification relay endpoint.
//!
//! The relay endpoint accepts a single JSON body of the form
//! `{ "action": "...", "data": { ... } }` and routes on `action`. Business
//! outcomes, including provider-side failures, are always HTTP 200 with a
//! `success` flag; non-200 responses are reserved for boundary errors.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ChannelKind;
use crate::services::notifications::{ConnectionCheck, SendRequest, SendResult};

// ============================================================================
// Request DTOs
// ============================================================================

/// Top-level request body for the relay endpoint.
///
/// A missing `action` falls through to the unknown-action rejection rather
/// than a deserialization error.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RelayRequest {
    /// One of `test_connection`, `send_message`, `send_bulk`, `get_analytics`
    #[serde(default)]
    pub action: String,
    /// Action-specific payload
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload for the `send_message` action.
///
/// Missing string fields deserialize to empty strings so that the relay's
/// own validation reports them; the endpoint never rejects a send payload
/// on shape alone.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SendMessagePayload {
    pub channel: Option<ChannelKind>,
    pub recipient: String,
    pub body: String,
    pub title: Option<String>,
    pub template_id: Option<String>,
    pub extra: Option<serde_json::Value>,
}

impl SendMessagePayload {
    /// Converts the payload into a relay send request.
    ///
    /// A missing channel falls back to SMS, the channel the bulk of the
    /// traffic travels over.
    pub fn into_send_request(self) -> SendRequest {
        SendRequest {
            channel: self.channel.unwrap_or_default(),
            recipient: self.recipient,
            body: self.body,
            title: self.title,
            template_id: self.template_id,
            extra: self.extra,
        }
    }
}

/// Payload for the `send_bulk` action.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BulkSendPayload {
    pub messages: Vec<SendMessagePayload>,
}

/// Payload for the `test_connection` action.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TestConnectionPayload {
    pub channel: Option<ChannelKind>,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Outcome of a `test_connection` action.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestConnectionResponse {
    pub success: bool,
    /// Sender identity the provider reports for this account
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ConnectionCheck> for TestConnectionResponse {
    fn from(check: ConnectionCheck) -> Self {
        Self {
            success: check.success,
            phone_number: check.sender,
            error: check.error_message,
        }
    }
}

/// Outcome of a single message send.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<SendResult> for SendMessageResponse {
    fn from(result: SendResult) -> Self {
        Self {
            success: result.success,
            message_id: result.provider_message_id,
            error: result.error_message,
        }
    }
}

/// Envelope for the `send_bulk` action with per-item outcomes in request
/// order.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkSendResponse {
    pub success: bool,
    pub data: BulkResults,
}

/// Per-item outcomes of a bulk send.
#[derive(Debug, Serialize, ToSchema)]
pub struct BulkResults {
    pub results: Vec<SendMessageResponse>,
}

/// Rejection body for an unrecognized action.
///
/// Field order is part of the wire contract; existing callers match the
/// body byte for byte.
#[derive(Debug, Serialize, ToSchema)]
pub struct RelayActionError {
    pub success: bool,
    pub error: String,
}

impl RelayActionError {
    pub fn invalid_action() -> Self {
        Self {
            success: false,
            error: "Invalid action".to_string(),
        }
    }
}
