//! WhatsApp notification provider implementation.
//!
//! Sends messages through the WhatsApp Business Cloud API using the
//! global `HTTP_CLIENT`. Free-form text is used when no template is
//! requested; template messages carry the configured language code.
//!
//! Cloud API Reference: https://developers.facebook.com/docs/whatsapp/cloud-api

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use super::phone::normalize_msisdn;
use super::provider::{
    ConnectionCheck, NotificationProvider, ParsedResponse, SendRequest, SendResult,
    http_error_fallback,
};
use crate::config::WhatsAppConfig;
use crate::external::HTTP_CLIENT;
use crate::models::ChannelKind;

/// WhatsApp Business Cloud API provider
///
/// # Example
/// ```ignore
/// let config = WhatsAppConfig {
///     access_token: "EAAG...".to_string(),
///     phone_number_id: "106540352242922".to_string(),
///     api_base: "https://graph.facebook.com/v19.0".to_string(),
///     template_language: "en".to_string(),
/// };
/// let provider = WhatsAppProvider::new(config, "971".to_string());
/// let result = provider.send(&request).await;
/// ```
#[derive(Clone)]
pub struct WhatsAppProvider {
    config: WhatsAppConfig,
    default_country_code: String,
}

impl WhatsAppProvider {
    /// Creates a new WhatsApp provider
    pub fn new(config: WhatsAppConfig, default_country_code: String) -> Self {
        Self {
            config,
            default_country_code,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id
        )
    }

    fn phone_number_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.phone_number_id
        )
    }

    /// Builds the JSON request body for the messages endpoint
    ///
    /// A request with a template id becomes a template message; the
    /// optional `extra` payload is passed through as the template
    /// components. Everything else is sent as free-form text.
    fn build_send_body(&self, request: &SendRequest) -> Value {
        // Cloud API expects MSISDN form, country code without a plus.
        let to = normalize_msisdn(&request.recipient, &self.default_country_code);

        match &request.template_id {
            Some(template) => {
                let mut body = json!({
                    "messaging_product": "whatsapp",
                    "to": to,
                    "type": "template",
                    "template": {
                        "name": template,
                        "language": { "code": self.config.template_language },
                    },
                });
                if let Some(extra) = &request.extra {
                    body["template"]["components"] = extra.clone();
                }
                body
            }
            None => json!({
                "messaging_product": "whatsapp",
                "to": to,
                "type": "text",
                "text": { "body": request.body },
            }),
        }
    }

    /// Decodes a response from the messages endpoint
    fn parse_send_response(status: StatusCode, body: &str) -> ParsedResponse {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);

        if status.is_success() {
            match parsed
                .get("messages")
                .and_then(|m| m.get(0))
                .and_then(|m| m.get("id"))
                .and_then(Value::as_str)
            {
                Some(message_id) => ParsedResponse::Accepted {
                    message_id: message_id.to_string(),
                },
                None => ParsedResponse::Rejected {
                    message: "missing message id in provider response".to_string(),
                },
            }
        } else {
            ParsedResponse::Rejected {
                message: Self::graph_error_message(&parsed)
                    .unwrap_or_else(|| http_error_fallback(status)),
            }
        }
    }

    /// Extracts the Graph API error description, if present
    fn graph_error_message(parsed: &Value) -> Option<String> {
        parsed
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[async_trait]
impl NotificationProvider for WhatsAppProvider {
    fn name(&self) -> &'static str {
        "whatsapp"
    }

    fn channel(&self) -> ChannelKind {
        ChannelKind::Whatsapp
    }

    /// Sends a message via the Cloud API messages endpoint
    async fn send(&self, request: &SendRequest) -> SendResult {
        let body = self.build_send_body(request);

        let response = HTTP_CLIENT
            .post(self.messages_url())
            .bearer_auth(&self.config.access_token)
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

    /// Verifies the token by fetching the business phone number details
    ///
    /// On success the display phone number reported by the API becomes
    /// the confirmed sender identity.
    async fn test_connection(&self) -> ConnectionCheck {
        let response = HTTP_CLIENT
            .get(self.phone_number_url())
            .query(&[("fields", "display_phone_number")])
            .bearer_auth(&self.config.access_token)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                let parsed: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

                if status.is_success() {
                    match parsed.get("display_phone_number").and_then(Value::as_str) {
                        Some(number) => ConnectionCheck::ok_with_sender(number),
                        None => ConnectionCheck::ok(),
                    }
                } else {
                    ConnectionCheck::failure(
                        Self::graph_error_message(&parsed)
                            .unwrap_or_else(|| http_error_fallback(status)),
                    )
                }
            }
            Err(e) => ConnectionCheck::failure(e.to_string()),
        }
    }
}
