//! Delivery log and status callback DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{ChannelKind, DeliveryLogEntry, DeliveryStatus};

/// Query filter for the delivery log list.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct LogFilterParams {
    /// Restrict entries to one channel
    pub channel: Option<ChannelKind>,
    /// Restrict entries to one delivery status
    pub status: Option<DeliveryStatus>,
}

/// Request body for a provider delivery status callback.
///
/// Providers report later lifecycle events (delivered, failed after accept)
/// keyed by the message id they returned at send time.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StatusCallbackRequest {
    #[validate(length(min = 1, message = "Provider message id must not be empty"))]
    pub provider_message_id: String,
    pub status: DeliveryStatus,
    /// Free-form detail from the provider, kept with the appended entry
    pub description: Option<String>,
}

/// Response body for a delivery log entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogResponse {
    pub id: i64,
    pub channel: ChannelKind,
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Id of the original entry when this row records a status change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlates_to: Option<i64>,
    pub created_at: String,
}

impl From<DeliveryLogEntry> for DeliveryLogResponse {
    fn from(entry: DeliveryLogEntry) -> Self {
        Self {
            id: entry.id,
            channel: entry.channel,
            recipient: entry.recipient,
            provider: entry.provider,
            status: entry.status,
            provider_message_id: entry.provider_message_id,
            error_message: entry.error_message,
            template_id: entry.template_id,
            correlates_to: entry.correlates_to,
            created_at: entry.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}
