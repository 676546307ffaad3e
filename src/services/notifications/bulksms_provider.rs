//! BulkSMS notification provider implementation.
//!
//! Sends SMS messages through the BulkSMS JSON REST API using the global
//! `HTTP_CLIENT`. Authentication is HTTP basic auth with the account
//! username and password.
//!
//! BulkSMS API Reference: https://www.bulksms.com/developer/json/v1/

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use super::phone::normalize_plus_e164;
use super::provider::{
    ConnectionCheck, NotificationProvider, ParsedResponse, SendRequest, SendResult,
    http_error_fallback, json_id_string,
};
use crate::config::BulkSmsConfig;
use crate::external::HTTP_CLIENT;
use crate::models::ChannelKind;

/// BulkSMS notification provider
///
/// # Example
/// ```ignore
/// let config = BulkSmsConfig {
///     username: "wedding".to_string(),
///     password: "secret".to_string(),
///     base_url: "https://api.bulksms.com/v1".to_string(),
///     sender: Some("Wedding".to_string()),
/// };
/// let provider = BulkSmsProvider::new(config, "971".to_string());
/// let result = provider.send(&request).await;
/// ```
#[derive(Clone)]
pub struct BulkSmsProvider {
    config: BulkSmsConfig,
    default_country_code: String,
}

impl BulkSmsProvider {
    /// Creates a new BulkSMS provider
    ///
    /// # Arguments
    /// * `config` - Account credentials and endpoint
    /// * `default_country_code` - Country code applied to local numbers
    pub fn new(config: BulkSmsConfig, default_country_code: String) -> Self {
        Self {
            config,
            default_country_code,
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.config.base_url.trim_end_matches('/'))
    }

    fn profile_url(&self) -> String {
        format!("{}/profile", self.config.base_url.trim_end_matches('/'))
    }

    /// Builds the JSON request body for the messages endpoint
    fn build_send_body(&self, request: &SendRequest) -> Value {
        let to = normalize_plus_e164(&request.recipient, &self.default_country_code);
        let mut body = json!({
            "to": to,
            "body": request.body,
        });
        if let Some(sender) = &self.config.sender {
            body["from"] = json!(sender);
        }
        body
    }

    /// Decodes a response from the messages endpoint
    ///
    /// A successful submission returns an array of message objects, each
    /// carrying the id BulkSMS assigned. A 2xx response without an id is
    /// treated as a rejection so the delivery log never records a success
    /// it can not correlate later.
    fn parse_send_response(status: StatusCode, body: &str) -> ParsedResponse {
        if status.is_success() {
            let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
            match parsed.get(0).and_then(|m| m.get("id")).and_then(json_id_string) {
                Some(message_id) => ParsedResponse::Accepted { message_id },
                None => ParsedResponse::Rejected {
                    message: "missing message id in provider response".to_string(),
                },
            }
        } else {
            ParsedResponse::Rejected {
                message: Self::parse_error_message(status, body),
            }
        }
    }

    /// Extracts the error description from a failure response
    ///
    /// BulkSMS errors follow RFC 7807 with `title` and `detail` fields.
    fn parse_error_message(status: StatusCode, body: &str) -> String {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        parsed
            .get("detail")
            .and_then(Value::as_str)
            .or_else(|| parsed.get("title").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| http_error_fallback(status))
    }
}

#[async_trait]
impl NotificationProvider for BulkSmsProvider {
    fn name(&self) -> &'static str {
        "bulksms"
    }

    fn channel(&self) -> ChannelKind {
        ChannelKind::Sms
    }

    fn sender(&self) -> Option<&str> {
        self.config.sender.as_deref()
    }

    /// Sends an SMS via the BulkSMS messages endpoint
    async fn send(&self, request: &SendRequest) -> SendResult {
        let body = self.build_send_body(request);

        let response = HTTP_CLIENT
            .post(self.messages_url())
            .basic_auth(&self.config.username, Some(&self.config.password))
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

    /// Verifies the credentials by fetching the account profile
    async fn test_connection(&self) -> ConnectionCheck {
        let response = HTTP_CLIENT
            .get(self.profile_url())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match &self.config.sender {
                Some(sender) => ConnectionCheck::ok_with_sender(sender),
                None => ConnectionCheck::ok(),
            },
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                ConnectionCheck::failure(Self::parse_error_message(status, &text))
            }
            Err(e) => ConnectionCheck::failure(e.to_string()),
        }
    }
}
