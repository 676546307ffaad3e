use utoipa::OpenApi;

pub const RELAY_TAG: &str = "Relay";
pub const GUEST_TAG: &str = "Guests";
pub const NOTIFICATION_TAG: &str = "Notifications";
pub const DASHBOARD_TAG: &str = "Dashboard";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "RSVP Relay",
        description = "Multi-channel notification relay for wedding RSVP tracking",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::api::dto::SendMessagePayload,
            crate::api::dto::BulkSendPayload,
            crate::api::dto::TestConnectionPayload,
        )
    ),
    tags(
        (name = RELAY_TAG, description = "Action-dispatch notification relay"),
        (name = GUEST_TAG, description = "Guest and RSVP management endpoints"),
        (name = NOTIFICATION_TAG, description = "Delivery log and status callback endpoints"),
        (name = DASHBOARD_TAG, description = "Aggregate attendance and delivery tallies"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
