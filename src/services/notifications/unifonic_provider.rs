//! Unifonic notification provider implementation.
//!
//! Sends SMS messages through the Unifonic REST gateway using the global
//! `HTTP_CLIENT`. The gateway expects form-encoded requests and bare
//! MSISDN recipient numbers without a `+` prefix.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use super::phone::normalize_msisdn;
use super::provider::{
    ConnectionCheck, NotificationProvider, ParsedResponse, SendRequest, SendResult,
    http_error_fallback, json_id_string,
};
use crate::config::UnifonicConfig;
use crate::external::HTTP_CLIENT;
use crate::models::ChannelKind;

/// Unifonic notification provider
///
/// # Example
/// ```ignore
/// let config = UnifonicConfig {
///     app_sid: "AbCdEf123456".to_string(),
///     sender_id: "Wedding".to_string(),
///     base_url: "https://el.cloud.unifonic.com/rest".to_string(),
/// };
/// let provider = UnifonicProvider::new(config, "971".to_string());
/// let result = provider.send(&request).await;
/// ```
#[derive(Clone)]
pub struct UnifonicProvider {
    config: UnifonicConfig,
    default_country_code: String,
}

impl UnifonicProvider {
    /// Creates a new Unifonic provider
    pub fn new(config: UnifonicConfig, default_country_code: String) -> Self {
        Self {
            config,
            default_country_code,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/SMS/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn balance_url(&self) -> String {
        format!(
            "{}/Account/GetBalance",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Builds the form parameters for the messages endpoint
    fn build_send_form(&self, request: &SendRequest) -> Vec<(&'static str, String)> {
        vec![
            ("AppSid", self.config.app_sid.clone()),
            ("SenderID", self.config.sender_id.clone()),
            (
                "Recipient",
                normalize_msisdn(&request.recipient, &self.default_country_code),
            ),
            ("Body", request.body.clone()),
        ]
    }

    /// Reads the gateway's success flag
    ///
    /// The REST gateway reports success as a JSON bool or as the string
    /// "true" depending on the endpoint revision.
    fn success_flag(value: &Value) -> bool {
        match value.get("success") {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Decodes a response from the messages endpoint
    fn parse_send_response(status: StatusCode, body: &str) -> ParsedResponse {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

        if status.is_success() && Self::success_flag(&parsed) {
            match parsed
                .get("data")
                .and_then(|d| d.get("MessageID"))
                .and_then(json_id_string)
            {
                Some(message_id) => ParsedResponse::Accepted { message_id },
                None => ParsedResponse::Rejected {
                    message: "missing message id in provider response".to_string(),
                },
            }
        } else {
            ParsedResponse::Rejected {
                message: parsed
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| http_error_fallback(status)),
            }
        }
    }
}

#[async_trait]
impl NotificationProvider for UnifonicProvider {
    fn name(&self) -> &'static str {
        "unifonic"
    }

    fn channel(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    fn sender(&self) -> Option<&str> {
        Some(&self.config.sender_id)
    }

    /// Sends an SMS via the Unifonic messages endpoint
    async fn send(&self, request: &SendRequest) -> SendResult {
        let form = self.build_send_form(request);

        let response = HTTP_CLIENT
            .post(self.messages_url())
            .form(&form)
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

    /// Verifies the credentials by querying the account balance
    async fn test_connection(&self) -> ConnectionCheck {
        let response = HTTP_CLIENT
            .post(self.balance_url())
            .form(&[("AppSid", self.config.app_sid.clone())])
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
                if status.is_success() && Self::success_flag(&parsed) {
                    ConnectionCheck::ok_with_sender(&self.config.sender_id)
                } else {
                    let message = parsed
                        .get("message")
                        .and_then(Value::as_str)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| http_error_fallback(status));
                    ConnectionCheck::failure(message)
                }
            }
            Err(e) => ConnectionCheck::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> UnifonicProvider {
        UnifonicProvider::new(
            UnifonicConfig {
                app_sid: "AbCdEf123456".to_string(),
                sender_id: "Wedding".to_string(),
                base_url: "https://el.cloud.unifonic.com/rest".to_string(),
            },
            "971".to_string(),
        )
    }

    #[test]
    fn test_build_send_form_uses_msisdn_recipient() {
        let request = SendRequest {
            recipient: "+971501234567".to_string(),
            body: "Dinner starts at eight".to_string(),
            ..Default::default()
        };
        let form = provider().build_send_form(&request);
        assert_eq!(
            form,
            vec![
                ("AppSid", "AbCdEf123456".to_string()),
                ("SenderID", "Wedding".to_string()),
                ("Recipient", "971501234567".to_string()),
                ("Body", "Dinner starts at eight".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_accepted_with_bool_success() {
        let body = r#"{"success": true, "message": "", "data": {"MessageID": 310855}}"#;
        let parsed = UnifonicProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Accepted {
                message_id: "310855".to_string()
            }
        );
    }

    #[test]
    fn test_parse_accepted_with_string_success() {
        let body = r#"{"success": "true", "data": {"MessageID": "310856"}}"#;
        let parsed = UnifonicProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Accepted {
                message_id: "310856".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejection_uses_gateway_message() {
        let body = r#"{"success": "false", "message": "Invalid AppSid"}"#;
        let parsed = UnifonicProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Rejected {
                message: "Invalid AppSid".to_string()
            }
        );
    }

    #[test]
    fn test_parse_success_without_id_is_rejected() {
        let body = r#"{"success": true, "data": {}}"#;
        let parsed = UnifonicProvider::parse_send_response(StatusCode::OK, body);
        assert_eq!(
            parsed,
            ParsedResponse::Rejected {
                message: "missing message id in provider response".to_string()
            }
        );
    }

    #[test]
    fn test_parse_http_error_falls_back_to_status() {
        let parsed = UnifonicProvider::parse_send_response(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            parsed,
            ParsedResponse::Rejected {
                message: "HTTP 503: Service Unavailable".to_string()
            }
        );
    }
}
