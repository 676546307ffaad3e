//! Guest repository for async database operations.
//!
//! Provides CRUD operations for the guests table using diesel_async.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Guest, GuestStatus, NewGuest};

/// Guest repository holding an async connection pool.
///
/// Since `AsyncDbPool` (bb8::Pool) internally uses `Arc`, cloning is cheap
/// (just reference count increment). No need for `Arc<GuestRepository>`.
#[derive(Clone)]
pub struct GuestRepository {
    pool: AsyncDbPool,
}

impl GuestRepository {
    /// Creates a new GuestRepository with the given connection pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Creates a new guest in the database.
    ///
    /// # Arguments
    /// * `new_guest` - The guest data to insert
    ///
    /// # Returns
    /// The created guest with generated id and timestamps
    ///
    /// # Errors
    /// `Duplicate` when the invitation id is already taken
    pub async fn create(&self, new_guest: NewGuest) -> AppResult<Guest> {
        use crate::schema::guests::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::insert_into(guests)
            .values(&new_guest)
            .returning(Guest::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Finds a guest by their invitation id.
    ///
    /// # Arguments
    /// * `invitation` - The unique invitation slug
    ///
    /// # Returns
    /// `Some(Guest)` if found, `None` otherwise
    pub async fn find_by_invitation_id(&self, invitation: &str) -> AppResult<Option<Guest>> {
        use crate::schema::guests::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        guests
            .filter(invitation_id.eq(invitation))
            .select(Guest::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    /// Lists guests newest first with an optional status filter.
    ///
    /// # Arguments
    /// * `status_filter` - Restrict to one RSVP status when present
    /// * `offset` - Number of records to skip
    /// * `limit` - Maximum number of records to return
    ///
    /// # Returns
    /// Tuple of (guests vector, total count)
    pub async fn list(
        &self,
        status_filter: Option<GuestStatus>,
        offset_rows: i64,
        limit_rows: i64,
    ) -> AppResult<(Vec<Guest>, i64)> {
        use crate::schema::guests::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        let mut query = guests.into_boxed();
        let mut count_query = guests.into_boxed();
        if let Some(wanted) = status_filter {
            query = query.filter(status.eq(wanted));
            count_query = count_query.filter(status.eq(wanted));
        }

        let rows = query
            .order(created_at.desc())
            .offset(offset_rows)
            .limit(limit_rows)
            .select(Guest::as_select())
            .load(&mut conn)
            .await
            .map_err(AppError::from)?;

        let total = count_query
            .count()
            .get_result::<i64>(&mut conn)
            .await
            .map_err(AppError::from)?;

        Ok((rows, total))
    }

    /// Updates a guest's RSVP status, stamping the response time.
    ///
    /// `confirmed_at` records when the guest answered, whichever answer
    /// they gave. `updated_at` is maintained by a database trigger.
    ///
    /// # Errors
    /// `NotFound` when no guest carries the invitation id
    pub async fn update_status(
        &self,
        invitation: &str,
        new_status: GuestStatus,
    ) -> AppResult<Guest> {
        use crate::schema::guests::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        diesel::update(guests.filter(invitation_id.eq(invitation)))
            .set((
                status.eq(new_status),
                confirmed_at.eq(Some(chrono::Utc::now().naive_utc())),
            ))
            .returning(Guest::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("guest", "invitation_id", invitation))
    }

    /// Aggregates guest counts per RSVP status for the dashboard.
    pub async fn status_counts(&self) -> AppResult<Vec<(GuestStatus, i64)>> {
        use crate::schema::guests::dsl::*;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| AppError::ConnectionPool {
                source: anyhow::Error::from(e),
            })?;

        guests
            .group_by(status)
            .select((status, diesel::dsl::count_star()))
            .load::<(GuestStatus, i64)>(&mut conn)
            .await
            .map_err(AppError::from)
    }
}
