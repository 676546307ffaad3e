//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories, providers and handlers.

mod guest_service;
pub mod notifications;
pub mod watcher;

pub use guest_service::GuestService;
pub use notifications::NotificationService;

use std::sync::Arc;

use notifications::ProviderRegistry;
use watcher::ChangeFeed;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning is cheap since underlying pools use `Arc` internally.
#[derive(Clone)]
pub struct Services {
    pub guests: GuestService,
    pub notifications: NotificationService,
}

impl Services {
    /// Creates a new Services instance from repositories, the provider
    /// registry and the guest change feed.
    pub fn new(repos: Repositories, providers: Arc<ProviderRegistry>, feed: ChangeFeed) -> Self {
        Self {
            guests: GuestService::new(repos.guests, feed),
            notifications: NotificationService::new(providers, Arc::new(repos.delivery_log)),
        }
    }
}
