//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;

use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;
use crate::services::notifications::ProviderRegistry;
use crate::services::watcher::ChangeFeed;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning is cheap since the services and the pool use Arc internally.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Direct access to the database connection pool
    pub db_pool: AsyncDbPool,
}

impl AppState {
    /// Creates a new AppState from a connection pool, the configured
    /// provider registry and the guest change feed.
    ///
    /// Initializes all repositories and services from the provided pool.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `providers` - Channel providers built from configuration
    /// * `feed` - Feed the guest service publishes RSVP changes to
    pub fn new(pool: AsyncDbPool, providers: Arc<ProviderRegistry>, feed: ChangeFeed) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, providers, feed);
        Self {
            services,
            db_pool: pool,
        }
    }
}
