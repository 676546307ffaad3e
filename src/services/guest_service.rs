//! Guest service for business logic operations.
//!
//! Provides a higher-level API for guest management and RSVP writes,
//! encapsulating business rules and coordinating with the repository
//! layer. Every RSVP write is published to the change feed so the
//! watcher can relay the transition.

use uuid::Uuid;

use super::watcher::{ChangeFeed, GuestChange};
use crate::error::{AppError, AppResult};
use crate::models::{Guest, GuestStatus, NewGuest};
use crate::repositories::GuestRepository;

/// Guest service for handling guest-related business logic.
///
/// This service wraps the `GuestRepository` and provides business-level
/// operations. Since `GuestRepository` uses `Arc` internally via the
/// connection pool, cloning is cheap.
#[derive(Clone)]
pub struct GuestService {
    repo: GuestRepository,
    feed: ChangeFeed,
}

impl GuestService {
    /// Creates a new GuestService with the given repository and feed.
    pub fn new(repo: GuestRepository, feed: ChangeFeed) -> Self {
        Self { repo, feed }
    }

    /// Creates a new guest invitation.
    ///
    /// Assigns a fresh invitation id and starts the guest in `pending`
    /// status. Creation is not published to the change feed; only RSVP
    /// writes are.
    ///
    /// # Arguments
    /// * `full_name` - The guest's display name
    ///
    /// # Returns
    /// The created guest with generated id, invitation id and timestamps
    pub async fn create_guest(&self, full_name: String) -> AppResult<Guest> {
        let new_guest = NewGuest {
            full_name,
            invitation_id: Uuid::new_v4().simple().to_string(),
            status: GuestStatus::Pending,
        };
        self.repo.create(new_guest).await
    }

    /// Gets a guest by their invitation id.
    ///
    /// # Arguments
    /// * `invitation_id` - The unique invitation slug
    ///
    /// # Returns
    /// The guest if found, or `NotFound` error
    pub async fn get_guest(&self, invitation_id: &str) -> AppResult<Guest> {
        self.repo
            .find_by_invitation_id(invitation_id)
            .await?
            .ok_or_else(|| AppError::not_found("guest", "invitation_id", invitation_id))
    }

    /// Lists guests with pagination and an optional status filter.
    ///
    /// # Arguments
    /// * `status` - Restrict to one RSVP status when present
    /// * `offset` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// A tuple of (guests, total_count)
    pub async fn list_guests(
        &self,
        status: Option<GuestStatus>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Guest>, i64)> {
        self.repo.list(status, offset, limit).await
    }

    /// Records a guest's RSVP answer.
    ///
    /// Updates the status, stamps the response time and publishes the
    /// before/after snapshots to the change feed.
    ///
    /// # Arguments
    /// * `invitation_id` - The unique invitation slug
    /// * `answer` - The chosen status, `confirmed` or `apologized`
    ///
    /// # Returns
    /// The updated guest
    pub async fn rsvp(&self, invitation_id: &str, answer: GuestStatus) -> AppResult<Guest> {
        if answer == GuestStatus::Pending {
            return Err(AppError::Validation {
                field: "status".to_string(),
                reason: "status must be confirmed or apologized".to_string(),
            });
        }

        let before = self.get_guest(invitation_id).await?;
        let after = self.repo.update_status(invitation_id, answer).await?;

        self.feed.publish(GuestChange {
            before: Some(before),
            after: after.clone(),
        });

        Ok(after)
    }

    /// Aggregates guest counts per RSVP status.
    pub async fn status_counts(&self) -> AppResult<Vec<(GuestStatus, i64)>> {
        self.repo.status_counts().await
    }
}
