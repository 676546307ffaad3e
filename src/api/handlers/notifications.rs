//! Delivery log API handlers.
//!
//! Exposes the append-only delivery audit trail and the provider status
//! callback that appends correlated lifecycle entries.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::{
    DeliveryLogResponse, LogFilterParams, PagedResponse, PaginationParams, StatusCallbackRequest,
};
use crate::error::AppResult;
use crate::repositories::DeliveryLogFilter;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates delivery log routes.
///
/// Routes:
/// - GET /api/notifications/logs    - List delivery log entries
/// - POST /api/notifications/status - Provider delivery status callback
pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_logs))
        .routes(routes!(status_callback))
}

/// GET /api/notifications/logs - List delivery log entries
///
/// Newest first, optionally filtered by channel and delivery status.
#[utoipa::path(
    get,
    path = "/api/notifications/logs",
    tag = NOTIFICATION_TAG,
    params(LogFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated delivery log", body = PagedResponse<DeliveryLogResponse>)
    )
)]
async fn list_logs(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<LogFilterParams>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<DeliveryLogResponse>>> {
    let params = params.normalize();
    let (entries, total) = state
        .services
        .notifications
        .get_logs(DeliveryLogFilter {
            channel: filter.channel,
            status: filter.status,
            offset: params.offset() as i64,
            limit: params.limit() as i64,
        })
        .await?;

    let responses: Vec<DeliveryLogResponse> =
        entries.into_iter().map(DeliveryLogResponse::from).collect();
    Ok(Json(PagedResponse::new(responses, &params, total as u64)))
}

/// POST /api/notifications/status - Provider delivery status callback
///
/// Appends a status entry correlated to the original send, looked up by the
/// provider's message id. The log is append-only; the original entry is
/// never rewritten.
#[utoipa::path(
    post,
    path = "/api/notifications/status",
    tag = NOTIFICATION_TAG,
    request_body = StatusCallbackRequest,
    responses(
        (status = 200, description = "Appended status entry", body = DeliveryLogResponse),
        (status = 404, description = "No entry matches the provider message id")
    )
)]
async fn status_callback(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StatusCallbackRequest>,
) -> AppResult<Json<DeliveryLogResponse>> {
    let entry = state
        .services
        .notifications
        .record_status_change(
            &payload.provider_message_id,
            payload.status,
            payload.description,
        )
        .await?;
    Ok(Json(DeliveryLogResponse::from(entry)))
}
