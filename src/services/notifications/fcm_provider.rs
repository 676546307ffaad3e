//! Firebase Cloud Messaging provider implementation.
//!
//! Sends push notifications through the FCM legacy HTTP API using the
//! global `HTTP_CLIENT`. The recipient is a device registration token,
//! so no phone number normalization applies.
//!
//! FCM Legacy API Reference: https://firebase.google.com/docs/cloud-messaging/http-server-ref

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use super::provider::{
    ConnectionCheck, NotificationProvider, ParsedResponse, SendRequest, SendResult,
    http_error_fallback, json_id_string,
};
use crate::config::FcmConfig;
use crate::external::HTTP_CLIENT;
use crate::models::ChannelKind;

/// Token used for the dry-run connectivity check. FCM validates the
/// server key before it looks at the target, so any syntactically valid
/// token works.
const DRY_RUN_TOKEN: &str = "invalid-token-ping";

/// Firebase Cloud Messaging provider
///
/// # Example
/// ```ignore
/// let config = FcmConfig {
///     server_key: "AAAA...".to_string(),
///     endpoint: "https://fcm.googleapis.com/fcm/send".to_string(),
/// };
/// let provider = FcmProvider::new(config);
/// let result = provider.send(&request).await;
/// ```
#[derive(Clone)]
pub struct FcmProvider {
    config: FcmConfig,
}

impl FcmProvider {
    /// Creates a new FCM provider
    pub fn new(config: FcmConfig) -> Self {
        Self { config }
    }

    fn authorization_header(&self) -> String {
        format!("key={}", self.config.server_key)
    }

    /// Builds the JSON request body for the send endpoint
    fn build_send_body(&self, request: &SendRequest) -> Value {
        let mut body = json!({
            "to": request.recipient,
            "notification": {
                "title": request.title.clone().unwrap_or_else(|| "Notification".to_string()),
                "body": request.body,
            },
        });
        if let Some(extra) = &request.extra {
            body["data"] = extra.clone();
        }
        body
    }

    /// Decodes a response from the send endpoint
    ///
    /// Single-token sends report per-token outcomes under `results`;
    /// topic sends put a numeric `message_id` at the top level.
    fn parse_send_response(status: StatusCode, body: &str) -> ParsedResponse {
        if !status.is_success() {
            return ParsedResponse::Rejected {
                message: http_error_fallback(status),
            };
        }

        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let first_result = parsed.get("results").and_then(|r| r.get(0));

        if let Some(message_id) = first_result
            .and_then(|r| r.get("message_id"))
            .and_then(json_id_string)
        {
            return ParsedResponse::Accepted { message_id };
        }
        if let Some(error) = first_result
            .and_then(|r| r.get("error"))
            .and_then(Value::as_str)
        {
            return ParsedResponse::Rejected {
                message: error.to_string(),
            };
        }
        if let Some(message_id) = parsed.get("message_id").and_then(json_id_string) {
            return ParsedResponse::Accepted { message_id };
        }

        ParsedResponse::Rejected {
            message: "missing message id in provider response".to_string(),
        }
    }
}

#[async_trait]
impl NotificationProvider for FcmProvider {
    fn name(&self) -> &'static str {
        "fcm"
    }

    fn channel(&self) -> ChannelKind {
        ChannelKind::Push
    }

    /// Sends a push notification to a device token
    async fn send(&self, request: &SendRequest) -> SendResult {
        let body = self.build_send_body(request);

        let response = HTTP_CLIENT
            .post(&self.config.endpoint)
            .header("Authorization", self.authorization_header())
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                Self::parse_send_response(status, &text).into()
            }
            Err(e) => SendResult::failure(e.to_string()),
        }
    }

    /// Verifies the server key with a dry-run send
    ///
    /// FCM answers 200 when the key is accepted even though the dry-run
    /// token itself is reported invalid in the body; 401 means the key
    /// was rejected.
    async fn test_connection(&self) -> ConnectionCheck {
        let body = json!({
            "registration_ids": [DRY_RUN_TOKEN],
            "dry_run": true,
        });

        let response = HTTP_CLIENT
            .post(&self.config.endpoint)
            .header("Authorization", self.authorization_header())
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => ConnectionCheck::ok(),
            Ok(resp) => ConnectionCheck::failure(http_error_fallback(resp.status())),
            Err(e) => ConnectionCheck::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> FcmProvider {
        FcmProvider::new(FcmConfig {
            server_key: "AAAAserverkey".to_string(),
            endpoint: "https://fcm.googleapis.com/fcm/send".to_string(),
        })
    }

    #[test]
    fn test_build_send_body_defaults_title() {
        let request = SendRequest {
            recipient: "device-token-1".to_string(),
            body: "A guest just confirmed".to_string(),
            ..Default::default()
        };
        let body = provider().build_send_body(&request);

        assert_eq!(body["to"], "device-token-1");
        assert_eq!(body["notification"]["title"], "Notification");
        assert_eq!(body["notification"]["body"], "A guest just confirmed");
        assert!(body.get("data").is_none());
    }

    #[test]
    fn test_build_send_body_with_title_and_data() {
        let request = SendRequest {
            recipient: "device-token-1".to_string(),
            body: "body".to_string(),
            title: Some("RSVP update".to_string()),
            extra: Some(json!({"guest": "Layla", "status": "confirmed"})),
            ..Default::default()
        };
        let body = provider().build_send_body(&request);

        assert_eq!(body["notification"]["title"], "RSVP update");
        assert_eq!(body["data"]["guest"], "Layla");
    }

    #[test]
    fn test_parse_accepted_token_send() {
        let body = r#"{"multicast_id":123,"success":1,"failure":0,"results":[{"message_id":"0:1538587689"}]}"#;
        let parsed = FcmProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Accepted {
                message_id: "0:1538587689".to_string()
            }
        );
    }

    #[test]
    fn test_parse_token_error() {
        let body = r#"{"multicast_id":123,"success":0,"failure":1,"results":[{"error":"InvalidRegistration"}]}"#;
        let parsed = FcmProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Rejected {
                message: "InvalidRegistration".to_string()
            }
        );
    }

    #[test]
    fn test_parse_topic_send_message_id() {
        let body = r#"{"message_id":6177170625342350000}"#;
        let parsed = FcmProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Accepted {
                message_id: "6177170625342350000".to_string()
            }
        );
    }

    #[test]
    fn test_parse_success_without_id_is_rejected() {
        let parsed = FcmProvider::parse_send_response(StatusCode::OK, "{}");
        assert_eq!(
            parsed,
            ParsedResponse::Rejected {
                message: "missing message id in provider response".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unauthorized_falls_back_to_status() {
        let parsed = FcmProvider::parse_send_response(StatusCode::UNAUTHORIZED, "<html>");
        assert_eq!(
            parsed,
            ParsedResponse::Rejected {
                message: "HTTP 401: Unauthorized".to_string()
            }
        );
    }
}
