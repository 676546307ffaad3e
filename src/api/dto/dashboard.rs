//! Status tally DTOs for the dashboard and the analytics action.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{DeliveryStatus, GuestStatus};

/// RSVP totals per status.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuestTally {
    pub pending: i64,
    pub confirmed: i64,
    pub apologized: i64,
    pub total: i64,
}

impl GuestTally {
    /// Folds grouped counts into a fixed-shape tally. Statuses with no rows
    /// report zero.
    pub fn from_counts(counts: &[(GuestStatus, i64)]) -> Self {
        let mut tally = Self {
            pending: 0,
            confirmed: 0,
            apologized: 0,
            total: 0,
        };
        for (status, count) in counts {
            match status {
                GuestStatus::Pending => tally.pending = *count,
                GuestStatus::Confirmed => tally.confirmed = *count,
                GuestStatus::Apologized => tally.apologized = *count,
            }
            tally.total += count;
        }
        tally
    }
}

/// Delivery log totals per status.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryTally {
    pub pending: i64,
    pub sent: i64,
    pub failed: i64,
    pub delivered: i64,
    pub total: i64,
}

impl DeliveryTally {
    pub fn from_counts(counts: &[(DeliveryStatus, i64)]) -> Self {
        let mut tally = Self {
            pending: 0,
            sent: 0,
            failed: 0,
            delivered: 0,
            total: 0,
        };
        for (status, count) in counts {
            match status {
                DeliveryStatus::Pending => tally.pending = *count,
                DeliveryStatus::Sent => tally.sent = *count,
                DeliveryStatus::Failed => tally.failed = *count,
                DeliveryStatus::Delivered => tally.delivered = *count,
            }
            tally.total += count;
        }
        tally
    }
}

/// Combined tallies served to the organizer dashboard.
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub guests: GuestTally,
    pub notifications: DeliveryTally,
}

/// Success envelope around the tallies, shared by the dashboard endpoint
/// and the relay's `get_analytics` action.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyticsEnvelope {
    pub success: bool,
    pub data: DashboardResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_tally_fills_missing_statuses() {
        let tally = GuestTally::from_counts(&[(GuestStatus::Confirmed, 12)]);
        assert_eq!(tally.confirmed, 12);
        assert_eq!(tally.pending, 0);
        assert_eq!(tally.apologized, 0);
        assert_eq!(tally.total, 12);
    }

    #[test]
    fn test_delivery_tally_sums_total() {
        let tally = DeliveryTally::from_counts(&[
            (DeliveryStatus::Sent, 5),
            (DeliveryStatus::Failed, 2),
            (DeliveryStatus::Delivered, 3),
        ]);
        assert_eq!(tally.total, 10);
        assert_eq!(tally.failed, 2);
        assert_eq!(tally.pending, 0);
    }
}
