//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `relay` - Action-dispatch DTOs for the notification relay endpoint
//! - `guest` - Guest and RSVP request/response DTOs
//! - `notification` - Delivery log and status callback DTOs
//! - `dashboard` - Status tally DTOs for the dashboard and analytics
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod dashboard;
mod error;
mod guest;
mod notification;
mod pagination;
mod relay;

pub use dashboard::{AnalyticsEnvelope, DashboardResponse, DeliveryTally, GuestTally};
pub use error::ErrorResponse;
pub use guest::{CreateGuestRequest, GuestListFilter, GuestResponse, RsvpRequest};
pub use notification::{DeliveryLogResponse, LogFilterParams, StatusCallbackRequest};
pub use pagination::{PagedResponse, PaginationParams};
pub use relay::{
    BulkResults, BulkSendPayload, BulkSendResponse, RelayActionError, RelayRequest,
    SendMessagePayload, SendMessageResponse, TestConnectionPayload, TestConnectionResponse,
};
