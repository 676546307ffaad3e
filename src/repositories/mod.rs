//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for all domain entities.

pub mod delivery_log_repo;
mod guest_repo;

pub use delivery_log_repo::{DeliveryLogFilter, DeliveryLogRepository, DeliveryStore};
pub use guest_repo::GuestRepository;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Since `AsyncDbPool` uses `Arc` internally, cloning is cheap.
#[derive(Clone)]
pub struct Repositories {
    pub guests: GuestRepository,
    pub delivery_log: DeliveryLogRepository,
}

impl Repositories {
    /// Creates a new Repositories instance with all repositories initialized.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            guests: GuestRepository::new(pool.clone()),
            delivery_log: DeliveryLogRepository::new(pool),
        }
    }
}
