//! Notification relay service.
//!
//! Routes send requests to the provider configured for their channel and
//! records every attempt in the delivery log, one entry per request.

use std::sync::Arc;

use futures::future::join_all;

use super::provider::{ConnectionCheck, NotificationProvider, SendError, SendRequest, SendResult};
use super::registry::ProviderRegistry;
use crate::error::{AppError, AppResult};
use crate::models::{ChannelKind, DeliveryLogEntry, DeliveryStatus, NewDeliveryLogEntry};
use crate::repositories::{DeliveryLogFilter, DeliveryStore};

/// Notification service handling message relay and delivery log queries
#[derive(Clone)]
pub struct NotificationService {
    providers: Arc<ProviderRegistry>,
    store: Arc<dyn DeliveryStore>,
}

impl NotificationService {
    /// Creates a new NotificationService
    ///
    /// # Arguments
    /// * `providers` - Registry of configured channel providers
    /// * `store` - Delivery log storage
    pub fn new(providers: Arc<ProviderRegistry>, store: Arc<dyn DeliveryStore>) -> Self {
        Self { providers, store }
    }

    // ========================================================================
    // Message Sending
    // ========================================================================

    /// Sends one notification and records the attempt
    ///
    /// Local failures (missing fields, unconfigured channel) and provider
    /// failures both come back as `SendResult { success: false }`; an `Err`
    /// only means the delivery log write itself failed. Exactly one log
    /// entry is appended per call, whatever the outcome.
    pub async fn notify(&self, request: SendRequest) -> AppResult<SendResult> {
        let (result, provider) = self.dispatch(&request).await;

        tracing::debug!(
            channel = %request.channel,
            provider = provider.unwrap_or("none"),
            success = result.success,
            "Notification dispatched"
        );

        self.store
            .append(Self::log_entry_for(&request, provider, &result))
            .await?;
        Ok(result)
    }

    /// Sends a batch of notifications
    ///
    /// Items are dispatched concurrently and independently; an invalid item
    /// becomes a failed result without aborting the rest. Results keep the
    /// request order. The delivery log receives the whole batch as one
    /// multi-row append after every dispatch has finished.
    pub async fn notify_bulk(&self, requests: Vec<SendRequest>) -> AppResult<Vec<SendResult>> {
        let outcomes = join_all(requests.iter().map(|request| self.dispatch(request))).await;

        let entries = requests
            .iter()
            .zip(&outcomes)
            .map(|(request, (result, provider))| Self::log_entry_for(request, *provider, result))
            .collect();
        self.store.append_batch(entries).await?;

        Ok(outcomes.into_iter().map(|(result, _)| result).collect())
    }

    /// Runs the credential check of the provider serving a channel
    ///
    /// A channel without a provider yields a failed check, not an error.
    /// When the provider API does not echo a sender identity, the one from
    /// configuration fills in.
    pub async fn test_connection(&self, channel: ChannelKind) -> ConnectionCheck {
        let Some(provider) = self.providers.get(channel) else {
            return ConnectionCheck::failure(
                SendError::UnsupportedChannel(channel.to_string()).to_string(),
            );
        };

        let mut check = provider.test_connection().await;
        if check.success && check.sender.is_none() {
            check.sender = provider.sender().map(str::to_string);
        }
        check
    }

    // ========================================================================
    // Delivery Log
    // ========================================================================

    /// Lists delivery log entries, newest first
    ///
    /// # Returns
    /// Tuple of (entries vector, total count)
    pub async fn get_logs(
        &self,
        filter: DeliveryLogFilter,
    ) -> AppResult<(Vec<DeliveryLogEntry>, i64)> {
        self.store.list(filter).await
    }

    /// Records a delivery state reported by a provider callback
    ///
    /// Looks up the original entry by the provider's message id and appends
    /// a correlated status entry.
    ///
    /// # Errors
    /// `NotFound` when no entry carries the provider message id
    pub async fn record_status_change(
        &self,
        provider_message_id: &str,
        new_status: DeliveryStatus,
        context: Option<String>,
    ) -> AppResult<DeliveryLogEntry> {
        let original = self
            .store
            .find_by_provider_message_id(provider_message_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "delivery log entry",
                    "provider_message_id",
                    provider_message_id,
                )
            })?;

        self.store
            .append_status_change(original.id, new_status, context)
            .await
    }

    /// Aggregates delivery counts per status for the dashboard
    pub async fn delivery_status_counts(&self) -> AppResult<Vec<(DeliveryStatus, i64)>> {
        self.store.status_counts().await
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    /// Validates a request and resolves the provider for its channel
    fn resolve(
        &self,
        request: &SendRequest,
    ) -> Result<&Arc<dyn NotificationProvider>, SendError> {
        if request.recipient.trim().is_empty() {
            return Err(SendError::Validation("recipient is required".to_string()));
        }
        if request.body.trim().is_empty() {
            return Err(SendError::Validation(
                "message body is required".to_string(),
            ));
        }
        self.providers
            .get(request.channel)
            .ok_or_else(|| SendError::UnsupportedChannel(request.channel.to_string()))
    }

    /// Dispatches one request, folding local failures into the result
    ///
    /// Returns the outcome together with the name of the provider involved,
    /// `None` when the request never reached one.
    async fn dispatch(&self, request: &SendRequest) -> (SendResult, Option<&'static str>) {
        match self.resolve(request) {
            Ok(provider) => (provider.send(request).await, Some(provider.name())),
            Err(e) => (SendResult::failure(e.to_string()), None),
        }
    }

    /// Builds the delivery log entry recording one dispatch outcome
    fn log_entry_for(
        request: &SendRequest,
        provider: Option<&'static str>,
        result: &SendResult,
    ) -> NewDeliveryLogEntry {
        NewDeliveryLogEntry {
            channel: request.channel,
            recipient: request.recipient.clone(),
            provider: provider.map(str::to_string),
            status: if result.success {
                DeliveryStatus::Sent
            } else {
                DeliveryStatus::Failed
            },
            provider_message_id: result.provider_message_id.clone(),
            error_message: result.error_message.clone(),
            template_id: request.template_id.clone(),
            correlates_to: None,
        }
    }
}
