//! Dashboard aggregate handler.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::DASHBOARD_TAG;
use crate::api::dto::{AnalyticsEnvelope, DashboardResponse, DeliveryTally, GuestTally};
use crate::error::AppResult;
use crate::state::AppState;

/// Creates the dashboard route.
pub fn dashboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(dashboard))
}

/// GET /api/dashboard - Attendance and delivery tallies
///
/// Same aggregate payload as the relay's `get_analytics` action, exposed as
/// a plain GET for the organizer dashboard.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = DASHBOARD_TAG,
    responses(
        (status = 200, description = "Guest and delivery status tallies", body = AnalyticsEnvelope)
    )
)]
async fn dashboard(State(state): State<AppState>) -> AppResult<Json<AnalyticsEnvelope>> {
    let tallies = collect_tallies(&state).await?;
    Ok(Json(AnalyticsEnvelope {
        success: true,
        data: tallies,
    }))
}

/// Builds the combined tallies from the guest and delivery log aggregates.
pub(crate) async fn collect_tallies(state: &AppState) -> AppResult<DashboardResponse> {
    let guest_counts = state.services.guests.status_counts().await?;
    let delivery_counts = state.services.notifications.delivery_status_counts().await?;
    Ok(DashboardResponse {
        guests: GuestTally::from_counts(&guest_counts),
        notifications: DeliveryTally::from_counts(&delivery_counts),
    })
}
