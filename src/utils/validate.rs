//! Request validation extractors.
//!
//! Wraps the axum `Json` and `Query` extractors so that deserialization
//! failures and validator rule violations both surface as the standard
//! error envelope instead of axum's plain-text rejections.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::api::dto::ErrorResponse;
use crate::api::middleware::{RequestId, json_rejection_error, query_rejection_error};

/// JSON body extractor that runs validator rules after deserialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = req.extensions().get::<RequestId>().map(|r| r.0.clone());
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| respond(json_rejection_error(rejection), request_id.as_deref()))?;
        value
            .validate()
            .map_err(|errors| respond(validation_failure(&errors), request_id.as_deref()))?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor that runs validator rules after deserialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts.extensions.get::<RequestId>().map(|r| r.0.clone());
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| respond(query_rejection_error(rejection), request_id.as_deref()))?;
        value
            .validate()
            .map_err(|errors| respond(validation_failure(&errors), request_id.as_deref()))?;
        Ok(ValidatedQuery(value))
    }
}

/// Flattens validator failures into one envelope message, one clause per
/// violated rule.
fn validation_failure(errors: &validator::ValidationErrors) -> (StatusCode, ErrorResponse) {
    let detail = errors
        .field_errors()
        .iter()
        .flat_map(|(field, failures)| {
            failures.iter().map(move |failure| match &failure.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid value", field),
            })
        })
        .collect::<Vec<_>>()
        .join("; ");
    (
        StatusCode::BAD_REQUEST,
        ErrorResponse::new("VALIDATION_ERROR", &detail),
    )
}

fn respond(parts: (StatusCode, ErrorResponse), request_id: Option<&str>) -> Response {
    let (status, mut body) = parts;
    if let Some(id) = request_id {
        body = body.with_request_id(id);
    }
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Debug, Deserialize, Validate)]
    struct TestBody {
        #[validate(length(min = 3, max = 20, message = "Name must be between 3 and 20 characters"))]
        name: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestParams {
        #[validate(range(min = 1, message = "Page must be at least 1"))]
        page: u32,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json_body() {
        let request = json_request(r#"{"name":"Layla"}"#);
        let ValidatedJson(body) = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(body.name, "Layla");
    }

    #[tokio::test]
    async fn test_rule_violation_uses_envelope() {
        let request = json_request(r#"{"name":"ab"}"#);
        let response = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"], "name: Name must be between 3 and 20 characters");
    }

    #[tokio::test]
    async fn test_syntax_error_uses_envelope() {
        let request = json_request("{not json");
        let response = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "JSON_SYNTAX_ERROR");
    }

    #[tokio::test]
    async fn test_request_id_attached_when_present() {
        let mut request = json_request(r#"{"name":"ab"}"#);
        request
            .extensions_mut()
            .insert(RequestId("req-42".to_string()));
        let response = ValidatedJson::<TestBody>::from_request(request, &())
            .await
            .unwrap_err();

        let json = body_json(response).await;
        assert_eq!(json["requestId"], "req-42");
    }

    #[tokio::test]
    async fn test_query_params_validated() {
        let request = Request::builder()
            .uri("/test?page=0")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let response = ValidatedQuery::<TestParams>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "page: Page must be at least 1");
    }

    #[tokio::test]
    async fn test_query_params_accepted() {
        let request = Request::builder()
            .uri("/test?page=2")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        let ValidatedQuery(params) =
            ValidatedQuery::<TestParams>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(params.page, 2);
    }
}
