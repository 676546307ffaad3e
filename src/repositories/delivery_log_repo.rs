//! Delivery log repository for async database operations.
//!
//! The audit trail is append-only. Later delivery states reported by
//! provider callbacks become new rows linked through `correlates_to`,
//! never in-place updates.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{ChannelKind, DeliveryLogEntry, DeliveryStatus, NewDeliveryLogEntry};

/// Filter and page window for listing delivery log entries
#[derive(Debug, Clone)]
pub struct DeliveryLogFilter {
    pub channel: Option<ChannelKind>,
    pub status: Option<DeliveryStatus>,
    pub offset: i64,
    pub limit: i64,
}

impl Default for DeliveryLogFilter {
    fn default() -> Self {
        Self {
            channel: None,
            status: None,
            offset: 0,
            limit: 20,
        }
    }
}

/// Storage capability for the delivery audit trail
///
/// The production implementation is [`DeliveryLogRepository`]; tests use
/// an in-memory store.
#[async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Appends one entry, assigning id and timestamp
    async fn append(&self, entry: NewDeliveryLogEntry) -> AppResult<DeliveryLogEntry>;

    /// Appends a batch of entries as a single atomic multi-row insert
    async fn append_batch(
        &self,
        entries: Vec<NewDeliveryLogEntry>,
    ) -> AppResult<Vec<DeliveryLogEntry>>;

    /// Records a later delivery state for an existing entry
    ///
    /// Appends a new row copying the original's channel, recipient and
    /// provider, linked through `correlates_to`. Context from the
    /// callback lands in `error_message`.
    ///
    /// # Errors
    /// `NotFound` when `original_id` does not exist
    async fn append_status_change(
        &self,
        original_id: i64,
        new_status: DeliveryStatus,
        context: Option<String>,
    ) -> AppResult<DeliveryLogEntry>;

    /// Finds an entry by id
    async fn find(&self, entry_id: i64) -> AppResult<Option<DeliveryLogEntry>>;

    /// Finds the original entry carrying a provider message id
    async fn find_by_provider_message_id(
        &self,
        message_id: &str,
    ) -> AppResult<Option<DeliveryLogEntry>>;

    /// Lists entries newest first with total count
    async fn list(&self, filter: DeliveryLogFilter) -> AppResult<(Vec<DeliveryLogEntry>, i64)>;

    /// Aggregates entry counts per delivery status
    async fn status_counts(&self) -> AppResult<Vec<(DeliveryStatus, i64)>>;
}

/// Delivery log repository backed by Postgres
#[derive(Clone)]
pub struct DeliveryLogRepository {
    pool: AsyncDbPool,
}

impl DeliveryLogRepository {
    /// Creates a new DeliveryLogRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeliveryStore for DeliveryLogRepository {
    async fn append(&self, entry: NewDeliveryLogEntry) -> AppResult<DeliveryLogEntry> {
        use crate::schema::delivery_log::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::insert_into(delivery_log)
            .values(&entry)
            .returning(DeliveryLogEntry::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn append_batch(
        &self,
        entries: Vec<NewDeliveryLogEntry>,
    ) -> AppResult<Vec<DeliveryLogEntry>> {
        use crate::schema::delivery_log::dsl::*;
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::insert_into(delivery_log)
            .values(&entries)
            .returning(DeliveryLogEntry::as_returning())
            .get_results(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn append_status_change(
        &self,
        original_id: i64,
        new_status: DeliveryStatus,
        context: Option<String>,
    ) -> AppResult<DeliveryLogEntry> {
        use crate::schema::delivery_log::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let original = delivery_log
            .find(original_id)
            .select(DeliveryLogEntry::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .ok_or_else(|| {
                AppError::not_found("delivery log entry", "id", original_id.to_string())
            })?;

        let change = NewDeliveryLogEntry {
            channel: original.channel,
            recipient: original.recipient,
            provider: original.provider,
            status: new_status,
            provider_message_id: None,
            error_message: context,
            template_id: None,
            correlates_to: Some(original_id),
        };

        diesel::insert_into(delivery_log)
            .values(&change)
            .returning(DeliveryLogEntry::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find(&self, entry_id: i64) -> AppResult<Option<DeliveryLogEntry>> {
        use crate::schema::delivery_log::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        delivery_log
            .find(entry_id)
            .select(DeliveryLogEntry::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn find_by_provider_message_id(
        &self,
        message_id: &str,
    ) -> AppResult<Option<DeliveryLogEntry>> {
        use crate::schema::delivery_log::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        delivery_log
            .filter(provider_message_id.eq(message_id))
            .select(DeliveryLogEntry::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list(&self, filter: DeliveryLogFilter) -> AppResult<(Vec<DeliveryLogEntry>, i64)> {
        use crate::schema::delivery_log::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let mut query = delivery_log.into_boxed();
        let mut count_query = delivery_log.into_boxed();
        if let Some(kind) = filter.channel {
            query = query.filter(channel.eq(kind));
            count_query = count_query.filter(channel.eq(kind));
        }
        if let Some(wanted) = filter.status {
            query = query.filter(status.eq(wanted));
            count_query = count_query.filter(status.eq(wanted));
        }

        let entries = query
            .order(created_at.desc())
            .offset(filter.offset)
            .limit(filter.limit)
            .select(DeliveryLogEntry::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = count_query
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((entries, total))
    }

    async fn status_counts(&self) -> AppResult<Vec<(DeliveryStatus, i64)>> {
        use crate::schema::delivery_log::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        delivery_log
            .group_by(status)
            .select((status, diesel::dsl::count_star()))
            .load::<(DeliveryStatus, i64)>(&mut conn)
            .await
            .map_err(AppError::from)
    }
}

#[cfg(test)]
pub mod memory {
    //! In-memory delivery store for service-level tests.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    pub struct MemoryDeliveryStore {
        entries: Mutex<Vec<DeliveryLogEntry>>,
        appends: AtomicUsize,
        batch_appends: AtomicUsize,
    }

    impl MemoryDeliveryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of every stored entry in insertion order
        pub fn all(&self) -> Vec<DeliveryLogEntry> {
            self.entries.lock().unwrap().clone()
        }

        /// Number of single-entry append calls received
        pub fn append_calls(&self) -> usize {
            AtomicUsize::load(&self.appends, Ordering::SeqCst)
        }

        /// Number of batch append calls received
        pub fn batch_calls(&self) -> usize {
            AtomicUsize::load(&self.batch_appends, Ordering::SeqCst)
        }

        fn materialize(entries: &mut Vec<DeliveryLogEntry>, entry: NewDeliveryLogEntry) -> DeliveryLogEntry {
            let stored = DeliveryLogEntry {
                id: entries.len() as i64 + 1,
                channel: entry.channel,
                recipient: entry.recipient,
                provider: entry.provider,
                status: entry.status,
                provider_message_id: entry.provider_message_id,
                error_message: entry.error_message,
                template_id: entry.template_id,
                correlates_to: entry.correlates_to,
                created_at: chrono::Utc::now().naive_utc(),
            };
            entries.push(stored.clone());
            stored
        }
    }

    #[async_trait]
    impl DeliveryStore for MemoryDeliveryStore {
        async fn append(&self, entry: NewDeliveryLogEntry) -> AppResult<DeliveryLogEntry> {
            self.appends.fetch_add(1, Ordering::SeqCst);
            let mut entries = self.entries.lock().unwrap();
            Ok(Self::materialize(&mut entries, entry))
        }

        async fn append_batch(
            &self,
            batch: Vec<NewDeliveryLogEntry>,
        ) -> AppResult<Vec<DeliveryLogEntry>> {
            self.batch_appends.fetch_add(1, Ordering::SeqCst);
            let mut entries = self.entries.lock().unwrap();
            Ok(batch
                .into_iter()
                .map(|entry| Self::materialize(&mut entries, entry))
                .collect())
        }

        async fn append_status_change(
            &self,
            original_id: i64,
            new_status: DeliveryStatus,
            context: Option<String>,
        ) -> AppResult<DeliveryLogEntry> {
            let mut entries = self.entries.lock().unwrap();
            let original = entries
                .iter()
                .find(|e| e.id == original_id)
                .cloned()
                .ok_or_else(|| {
                    AppError::not_found("delivery log entry", "id", original_id.to_string())
                })?;

            let change = NewDeliveryLogEntry {
                channel: original.channel,
                recipient: original.recipient,
                provider: original.provider,
                status: new_status,
                provider_message_id: None,
                error_message: context,
                template_id: None,
                correlates_to: Some(original_id),
            };
            Ok(Self::materialize(&mut entries, change))
        }

        async fn find(&self, entry_id: i64) -> AppResult<Option<DeliveryLogEntry>> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.iter().find(|e| e.id == entry_id).cloned())
        }

        async fn find_by_provider_message_id(
            &self,
            message_id: &str,
        ) -> AppResult<Option<DeliveryLogEntry>> {
            let entries = self.entries.lock().unwrap();
            Ok(entries
                .iter()
                .find(|e| e.provider_message_id.as_deref() == Some(message_id))
                .cloned())
        }

        async fn list(
            &self,
            filter: DeliveryLogFilter,
        ) -> AppResult<(Vec<DeliveryLogEntry>, i64)> {
            let entries = self.entries.lock().unwrap();
            let matching: Vec<DeliveryLogEntry> = entries
                .iter()
                .rev()
                .filter(|e| filter.channel.is_none_or(|c| e.channel == c))
                .filter(|e| filter.status.is_none_or(|s| e.status == s))
                .cloned()
                .collect();
            let total = matching.len() as i64;
            let page = matching
                .into_iter()
                .skip(filter.offset.max(0) as usize)
                .take(filter.limit.max(0) as usize)
                .collect();
            Ok((page, total))
        }

        async fn status_counts(&self) -> AppResult<Vec<(DeliveryStatus, i64)>> {
            let entries = self.entries.lock().unwrap();
            let counts = [
                DeliveryStatus::Pending,
                DeliveryStatus::Sent,
                DeliveryStatus::Failed,
                DeliveryStatus::Delivered,
            ]
            .into_iter()
            .filter_map(|wanted| {
                let count = entries.iter().filter(|e| e.status == wanted).count() as i64;
                (count > 0).then_some((wanted, count))
            })
            .collect();
            Ok(counts)
        }
    }
}
