//! Guest RSVP watcher.
//!
//! Observes guest record changes published by the guest service and
//! relays a summary of every status transition to the organizer. The
//! watcher never writes guest fields; it only reads change events.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::notifications::{NotificationService, SendRequest};
use crate::config::WatcherConfig;
use crate::models::{Guest, GuestStatus};

/// Capacity of the in-process change feed. RSVP writes are rare, so a
/// small buffer is enough to absorb bursts.
const FEED_CAPACITY: usize = 64;

/// Before/after snapshot of one guest record change
#[derive(Debug, Clone)]
pub struct GuestChange {
    /// State before the write, `None` for newly created records
    pub before: Option<Guest>,
    pub after: Guest,
}

/// Source of guest change events the watcher can subscribe to
pub trait GuestFeed: Send + Sync {
    fn subscribe(&self) -> broadcast::Receiver<GuestChange>;
}

/// In-process broadcast feed published by the guest service
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<GuestChange>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Publishes a change; dropped silently when nobody is subscribed
    pub fn publish(&self, change: GuestChange) {
        let _ = self.sender.send(change);
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl GuestFeed for ChangeFeed {
    fn subscribe(&self) -> broadcast::Receiver<GuestChange> {
        self.sender.subscribe()
    }
}

/// Decides whether a guest change warrants notifying the organizer
///
/// Only status transitions notify: updates that keep the status, newly
/// created records, and transitions back to `pending` plan nothing.
pub fn plan_notification(
    before: Option<&Guest>,
    after: &Guest,
    config: &WatcherConfig,
) -> Option<SendRequest> {
    let previous = before?;
    if previous.status == after.status {
        return None;
    }

    let verb = match after.status {
        GuestStatus::Confirmed => "confirmed",
        GuestStatus::Apologized => "apologized",
        GuestStatus::Pending => return None,
    };

    Some(SendRequest {
        channel: config.channel,
        recipient: config.organizer_recipient.clone(),
        body: format!("Guest {} {}", after.full_name, verb),
        title: Some("RSVP update".to_string()),
        template_id: None,
        extra: None,
    })
}

/// Handle to a running watcher task
pub struct WatcherHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl WatcherHandle {
    /// Whether the watcher task has terminated on its own
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the watcher and waits for the task to finish
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

/// Background task forwarding planned notifications to the relay
pub struct GuestWatcher;

impl GuestWatcher {
    /// Spawns the watcher on the current runtime
    ///
    /// The task ends when the handle is shut down or the feed closes.
    pub fn spawn(
        feed: &dyn GuestFeed,
        relay: NotificationService,
        config: WatcherConfig,
    ) -> WatcherHandle {
        let mut receiver = feed.subscribe();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            tracing::info!(
                channel = %config.channel,
                "Guest watcher started"
            );
            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    event = receiver.recv() => match event {
                        Ok(change) => {
                            Self::handle_change(&relay, &config, change).await;
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Guest watcher lagged behind the change feed");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            tracing::info!("Guest watcher stopped");
        });

        WatcherHandle { cancel, task }
    }

    async fn handle_change(relay: &NotificationService, config: &WatcherConfig, change: GuestChange) {
        let Some(request) = plan_notification(change.before.as_ref(), &change.after, config)
        else {
            return;
        };

        tracing::info!(
            guest = %change.after.full_name,
            status = %change.after.status,
            "Relaying guest status change to organizer"
        );
        match relay.notify(request).await {
            Ok(result) if !result.success => {
                tracing::warn!(
                    error = result.error_message.as_deref().unwrap_or("unknown"),
                    "Organizer notification failed"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to record organizer notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::models::ChannelKind;
    use crate::repositories::delivery_log_repo::memory::MemoryDeliveryStore;
    use crate::services::notifications::{
        ConnectionCheck, NotificationProvider, ProviderRegistry, SendResult,
    };

    fn guest(status: GuestStatus) -> Guest {
        let now = chrono::Utc::now().naive_utc();
        Guest {
            id: 1,
            full_name: "Layla Hassan".to_string(),
            invitation_id: "inv-123".to_string(),
            status,
            confirmed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn watcher_config() -> WatcherConfig {
        WatcherConfig {
            enabled: true,
            channel: ChannelKind::Whatsapp,
            organizer_recipient: "+971501234567".to_string(),
        }
    }

    #[test]
    fn test_no_plan_when_status_unchanged() {
        let before = guest(GuestStatus::Confirmed);
        let after = guest(GuestStatus::Confirmed);
        assert!(plan_notification(Some(&before), &after, &watcher_config()).is_none());
    }

    #[test]
    fn test_no_plan_for_new_records() {
        let after = guest(GuestStatus::Pending);
        assert!(plan_notification(None, &after, &watcher_config()).is_none());
    }

    #[test]
    fn test_plan_for_confirmation() {
        let before = guest(GuestStatus::Pending);
        let after = guest(GuestStatus::Confirmed);
        let request = plan_notification(Some(&before), &after, &watcher_config()).unwrap();

        assert_eq!(request.channel, ChannelKind::Whatsapp);
        assert_eq!(request.recipient, "+971501234567");
        assert_eq!(request.body, "Guest Layla Hassan confirmed");
    }

    #[test]
    fn test_plan_for_late_apology() {
        let before = guest(GuestStatus::Confirmed);
        let after = guest(GuestStatus::Apologized);
        let request = plan_notification(Some(&before), &after, &watcher_config()).unwrap();

        assert_eq!(request.body, "Guest Layla Hassan apologized");
    }

    struct AcceptingProvider;

    #[async_trait]
    impl NotificationProvider for AcceptingProvider {
        fn name(&self) -> &'static str {
            "accepting"
        }

        fn channel(&self) -> ChannelKind {
            ChannelKind::Whatsapp
        }

        async fn send(&self, _request: &SendRequest) -> SendResult {
            SendResult::accepted("relayed-1")
        }

        async fn test_connection(&self) -> ConnectionCheck {
            ConnectionCheck::ok()
        }
    }

    fn relay_with_store() -> (NotificationService, Arc<MemoryDeliveryStore>) {
        let mut registry = ProviderRegistry::empty();
        registry.register(Arc::new(AcceptingProvider));
        let store = Arc::new(MemoryDeliveryStore::new());
        let relay = NotificationService::new(Arc::new(registry), store.clone());
        (relay, store)
    }

    async fn wait_for_entries(store: &MemoryDeliveryStore, expected: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while store.all().len() < expected {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("watcher never relayed the change");
    }

    #[tokio::test]
    async fn test_watcher_relays_status_transitions() {
        let (relay, store) = relay_with_store();
        let feed = ChangeFeed::new();
        let handle = GuestWatcher::spawn(&feed, relay, watcher_config());

        feed.publish(GuestChange {
            before: Some(guest(GuestStatus::Pending)),
            after: guest(GuestStatus::Confirmed),
        });
        wait_for_entries(&store, 1).await;

        // An update that keeps the status is ignored.
        feed.publish(GuestChange {
            before: Some(guest(GuestStatus::Confirmed)),
            after: guest(GuestStatus::Confirmed),
        });
        feed.publish(GuestChange {
            before: Some(guest(GuestStatus::Confirmed)),
            after: guest(GuestStatus::Apologized),
        });
        wait_for_entries(&store, 2).await;

        let entries = store.all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel, ChannelKind::Whatsapp);
        assert_eq!(entries[0].recipient, "+971501234567");

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_watcher_stops_on_shutdown() {
        let (relay, store) = relay_with_store();
        let feed = ChangeFeed::new();
        let handle = GuestWatcher::spawn(&feed, relay, watcher_config());

        handle.shutdown().await;

        feed.publish(GuestChange {
            before: Some(guest(GuestStatus::Pending)),
            after: guest(GuestStatus::Confirmed),
        });
        tokio::task::yield_now().await;
        assert!(store.all().is_empty());
    }

    #[tokio::test]
    async fn test_watcher_stops_when_feed_closes() {
        let (relay, _store) = relay_with_store();
        let feed = ChangeFeed::new();
        let handle = GuestWatcher::spawn(&feed, relay, watcher_config());

        drop(feed);

        tokio::time::timeout(Duration::from_secs(2), async {
            while !handle.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("watcher kept running after the feed closed");
    }
}
