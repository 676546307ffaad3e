//! Guest-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{Guest, GuestStatus};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a guest invitation.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestRequest {
    #[validate(length(min = 1, max = 200, message = "Full name must be between 1 and 200 characters"))]
    #[schema(min_length = 1, max_length = 200)]
    pub full_name: String,
}

/// Request body for answering an invitation.
///
/// `pending` parses but is rejected downstream; an answer cannot move a
/// guest back to the undecided state.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RsvpRequest {
    pub status: GuestStatus,
}

/// Query filter for the guest list.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct GuestListFilter {
    /// Restrict the list to guests with this RSVP status
    pub status: Option<GuestStatus>,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for guest data.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestResponse {
    pub id: i64,
    pub full_name: String,
    /// Opaque identifier printed on the invitation
    pub invitation_id: String,
    pub status: GuestStatus,
    /// When the guest answered, absent while the RSVP is pending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Guest> for GuestResponse {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            full_name: guest.full_name,
            invitation_id: guest.invitation_id,
            status: guest.status,
            confirmed_at: guest
                .confirmed_at
                .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()),
            created_at: guest.created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            updated_at: guest.updated_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}
