//! Notification relay endpoint handler.
//!
//! A single action-dispatch endpoint carries all relay operations. Business
//! outcomes, including provider rejections, respond HTTP 200 with a
//! `success` flag so callers branch on the body rather than the status
//! code; non-200 responses are reserved for malformed requests and unknown
//! actions.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::RELAY_TAG;
use crate::api::dto::{
    AnalyticsEnvelope, BulkResults, BulkSendPayload, BulkSendResponse, RelayActionError,
    RelayRequest, SendMessagePayload, SendMessageResponse, TestConnectionPayload,
    TestConnectionResponse,
};
use crate::api::handlers::dashboard::collect_tallies;
use crate::error::{AppError, AppResult};
use crate::models::ChannelKind;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the relay route.
pub fn relay_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(dispatch_action))
}

/// POST /api/relay - Action dispatch for the notification relay
///
/// Accepts `{ action, data? }` and routes on `action`:
/// - `test_connection` - probe a channel's provider; data `{ channel? }`,
///   defaulting to WhatsApp
/// - `send_message` - send one notification; data is a send payload
/// - `send_bulk` - send several notifications; data `{ messages: [...] }`
/// - `get_analytics` - guest and delivery status tallies
#[utoipa::path(
    post,
    path = "/api/relay",
    tag = RELAY_TAG,
    request_body = RelayRequest,
    responses(
        (status = 200, description = "Business outcome with a success flag"),
        (status = 400, description = "Unknown action or malformed request")
    )
)]
async fn dispatch_action(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RelayRequest>,
) -> AppResult<Response> {
    match request.action.as_str() {
        "test_connection" => test_connection(&state, request.data).await,
        "send_message" => send_message(&state, request.data).await,
        "send_bulk" => send_bulk(&state, request.data).await,
        "get_analytics" => get_analytics(&state).await,
        other => {
            tracing::warn!(action = %other, "Rejected relay call with unknown action");
            Ok((
                StatusCode::BAD_REQUEST,
                Json(RelayActionError::invalid_action()),
            )
                .into_response())
        }
    }
}

async fn test_connection(state: &AppState, data: serde_json::Value) -> AppResult<Response> {
    let payload: TestConnectionPayload = parse_payload(data, "test_connection")?;
    let channel = payload.channel.unwrap_or(ChannelKind::Whatsapp);
    let check = state.services.notifications.test_connection(channel).await;
    Ok(Json(TestConnectionResponse::from(check)).into_response())
}

async fn send_message(state: &AppState, data: serde_json::Value) -> AppResult<Response> {
    let payload: SendMessagePayload = parse_payload(data, "send_message")?;
    let result = state
        .services
        .notifications
        .notify(payload.into_send_request())
        .await?;
    Ok(Json(SendMessageResponse::from(result)).into_response())
}

async fn send_bulk(state: &AppState, data: serde_json::Value) -> AppResult<Response> {
    let payload: BulkSendPayload = parse_payload(data, "send_bulk")?;
    let requests = payload
        .messages
        .into_iter()
        .map(SendMessagePayload::into_send_request)
        .collect();
    let results = state.services.notifications.notify_bulk(requests).await?;
    let results = results.into_iter().map(SendMessageResponse::from).collect();
    Ok(Json(BulkSendResponse {
        success: true,
        data: BulkResults { results },
    })
    .into_response())
}

async fn get_analytics(state: &AppState) -> AppResult<Response> {
    let tallies = collect_tallies(state).await?;
    Ok(Json(AnalyticsEnvelope {
        success: true,
        data: tallies,
    })
    .into_response())
}

/// Deserializes the action payload. A null or absent `data` falls back to
/// the payload's defaults so that field-level validation stays with the
/// relay; only structurally wrong data is rejected at the boundary.
fn parse_payload<T>(data: serde_json::Value, action: &str) -> AppResult<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if data.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(data).map_err(|e| AppError::BadRequest {
        message: format!("invalid data for action {}: {}", action, e),
    })
}

#[cfg(test)]
mod tests {
    use diesel_async::AsyncPgConnection;
    use diesel_async::pooled_connection::AsyncDieselConnectionManager;
    use diesel_async::pooled_connection::bb8::Pool;

    use super::*;
    use crate::services::notifications::ProviderRegistry;
    use crate::services::watcher::ChangeFeed;

    /// State over an unconnected pool and an empty registry. The dispatch
    /// rejection path never reaches either, so no database is needed.
    fn offline_state() -> AppState {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new("postgres://localhost/unused");
        let pool = Pool::builder().build_unchecked(manager);
        AppState::new(
            pool,
            std::sync::Arc::new(ProviderRegistry::empty()),
            ChangeFeed::new(),
        )
    }

    #[tokio::test]
    async fn test_unknown_action_rejected_with_stable_body() {
        let request = RelayRequest {
            action: "reboot_venue".to_string(),
            data: serde_json::Value::Null,
        };
        let response = dispatch_action(State(offline_state()), ValidatedJson(request))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(
            std::str::from_utf8(&bytes).unwrap(),
            r#"{"success":false,"error":"Invalid action"}"#
        );
    }

    #[tokio::test]
    async fn test_empty_action_rejected_like_unknown() {
        let request = RelayRequest {
            action: String::new(),
            data: serde_json::Value::Null,
        };
        let response = dispatch_action(State(offline_state()), ValidatedJson(request))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_payload_null_defaults() {
        let payload: TestConnectionPayload =
            parse_payload(serde_json::Value::Null, "test_connection").unwrap();
        assert!(payload.channel.is_none());
    }

    #[test]
    fn test_parse_payload_rejects_wrong_shape() {
        let result: AppResult<BulkSendPayload> =
            parse_payload(serde_json::json!({"messages": "not-a-list"}), "send_bulk");
        match result {
            Err(AppError::BadRequest { message }) => {
                assert!(message.contains("send_bulk"));
            }
            other => panic!("expected BadRequest, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_parse_payload_accepts_send_fields() {
        let payload: SendMessagePayload = parse_payload(
            serde_json::json!({"recipient": "+971501234567", "body": "hi"}),
            "send_message",
        )
        .unwrap();
        assert_eq!(payload.recipient, "+971501234567");
    }
}
