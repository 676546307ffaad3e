//! Guest API handlers.
//!
//! Serves the invitation page (fetch one guest, answer an RSVP) and the
//! organizer's guest management views.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::GUEST_TAG;
use crate::api::dto::{
    CreateGuestRequest, GuestListFilter, GuestResponse, PagedResponse, PaginationParams,
    RsvpRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};

/// Creates guest-related routes.
///
/// Routes:
/// - GET /api/guests                        - List guests
/// - POST /api/guests                       - Create a guest invitation
/// - GET /api/guests/{invitation_id}        - Fetch one guest
/// - POST /api/guests/{invitation_id}/rsvp  - Answer an invitation
pub fn guest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_guests, create_guest))
        .routes(routes!(get_guest))
        .routes(routes!(rsvp))
}

/// GET /api/guests - List guests
///
/// Returns guests with pagination, optionally filtered by RSVP status.
#[utoipa::path(
    get,
    path = "/api/guests",
    tag = GUEST_TAG,
    params(GuestListFilter, PaginationParams),
    responses(
        (status = 200, description = "Paginated guest list", body = PagedResponse<GuestResponse>)
    )
)]
async fn list_guests(
    State(state): State<AppState>,
    ValidatedQuery(filter): ValidatedQuery<GuestListFilter>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<PagedResponse<GuestResponse>>> {
    let params = params.normalize();
    let (guests, total) = state
        .services
        .guests
        .list_guests(filter.status, params.offset() as i64, params.limit() as i64)
        .await?;

    let responses: Vec<GuestResponse> = guests.into_iter().map(GuestResponse::from).collect();
    Ok(Json(PagedResponse::new(responses, &params, total as u64)))
}

/// POST /api/guests - Create a guest invitation
///
/// Assigns a fresh invitation id; the guest starts out pending.
#[utoipa::path(
    post,
    path = "/api/guests",
    tag = GUEST_TAG,
    request_body = CreateGuestRequest,
    responses(
        (status = 201, description = "Guest created", body = GuestResponse),
        (status = 400, description = "Invalid request")
    )
)]
async fn create_guest(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateGuestRequest>,
) -> AppResult<(StatusCode, Json<GuestResponse>)> {
    let guest = state.services.guests.create_guest(payload.full_name).await?;
    Ok((StatusCode::CREATED, Json(GuestResponse::from(guest))))
}

/// GET /api/guests/{invitation_id} - Fetch one guest
#[utoipa::path(
    get,
    path = "/api/guests/{invitation_id}",
    tag = GUEST_TAG,
    params(
        ("invitation_id" = String, Path, description = "Invitation identifier")
    ),
    responses(
        (status = 200, description = "Guest found", body = GuestResponse),
        (status = 404, description = "Guest not found")
    )
)]
async fn get_guest(
    State(state): State<AppState>,
    Path(invitation_id): Path<String>,
) -> AppResult<Json<GuestResponse>> {
    let guest = state.services.guests.get_guest(&invitation_id).await?;
    Ok(Json(GuestResponse::from(guest)))
}

/// POST /api/guests/{invitation_id}/rsvp - Answer an invitation
///
/// Accepts `confirmed` or `apologized`, stamps the answer time and notifies
/// the organizers through the watcher feed.
#[utoipa::path(
    post,
    path = "/api/guests/{invitation_id}/rsvp",
    tag = GUEST_TAG,
    params(
        ("invitation_id" = String, Path, description = "Invitation identifier")
    ),
    request_body = RsvpRequest,
    responses(
        (status = 200, description = "Updated guest", body = GuestResponse),
        (status = 400, description = "Status is not an answer"),
        (status = 404, description = "Guest not found")
    )
)]
async fn rsvp(
    State(state): State<AppState>,
    Path(invitation_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<RsvpRequest>,
) -> AppResult<Json<GuestResponse>> {
    let guest = state
        .services
        .guests
        .rsvp(&invitation_id, payload.status)
        .await?;
    Ok(Json(GuestResponse::from(guest)))
}
