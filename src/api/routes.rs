//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application. Routes are registered through
//! utoipa's OpenApiRouter so the served API and the OpenAPI document stay
//! in sync.

use axum::{Router, http::Method, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, request_id_middleware};
use crate::state::AppState;

/// Collects every handler group into one router plus the OpenAPI document
/// describing it.
fn api_router() -> (Router<AppState>, utoipa::openapi::OpenApi) {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::relay::relay_routes())
        .merge(handlers::guests::guest_routes())
        .merge(handlers::notifications::notification_routes())
        .merge(handlers::dashboard::dashboard_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts()
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs
/// first):
/// 1. CORS (outermost, answers preflight before anything else)
/// 2. Request ID middleware - generates/propagates request IDs
/// 3. Logging middleware - logs requests with request IDs
///
/// # Routes
/// - `/api/relay` - Action-dispatch notification relay
/// - `/api/guests` - Guest and RSVP management
/// - `/api/notifications` - Delivery log and status callbacks
/// - `/api/dashboard` - Aggregate tallies
/// - `/api/health` - Health and probe endpoints
/// - `/swagger-ui` - Interactive API documentation
pub fn create_router(state: AppState) -> Router {
    let (router, api) = api_router();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        // Middleware is applied in reverse order - last added runs first
        // So logging runs after request_id has set the ID
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_lists_all_routes() {
        let (_router, api) = api_router();

        let paths: Vec<&String> = api.paths.paths.keys().collect();
        for expected in [
            "/api/relay",
            "/api/guests",
            "/api/guests/{invitation_id}",
            "/api/guests/{invitation_id}/rsvp",
            "/api/notifications/logs",
            "/api/notifications/status",
            "/api/dashboard",
            "/api/health",
            "/api/health/ready",
            "/api/health/live",
        ] {
            assert!(
                paths.iter().any(|p| *p == expected),
                "missing path {}",
                expected
            );
        }
    }

    #[test]
    fn test_openapi_document_has_info() {
        let (_router, api) = api_router();
        assert_eq!(api.info.title, "RSVP Relay");
    }
}
