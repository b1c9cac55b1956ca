use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug)]
pub struct PoolInitializationError(pub String);

impl Display for PoolInitializationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum PortalError {
    #[error("webhook secret is not configured")]
    WebhookSecretMissing,
    #[error("missing webhook signature")]
    SignatureMissing,
    #[error("webhook signature mismatch")]
    SignatureMismatch,
    #[error("customer website API key is not configured")]
    CustomerApiKeyMissing,
}

/// Reservation lifecycle. Linear, with cancellation allowed from any
/// non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Arrived,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Arrived => "arrived",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "arrived" => Some(Self::Arrived),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Transition table for staff-driven status updates.
    pub fn can_become(&self, next: ReservationStatus) -> bool {
        match next {
            Self::Confirmed => *self == Self::Pending,
            Self::Arrived => *self == Self::Confirmed,
            Self::Completed => *self == Self::Arrived,
            Self::Cancelled => !self.is_terminal(),
            Self::Pending => false,
        }
    }
}

impl Display for ReservationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Worker,
    Admin,
    Owner,
}

impl StaffRole {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "worker" => Some(Self::Worker),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Self::Admin | Self::Owner)
    }
}

/// Loyalty ledger entry kinds accepted from the manual adjustment endpoint.
pub const ADJUSTMENT_TYPES: [&str; 3] = ["earn", "redeem", "adjust"];

pub const DEFAULT_COMPLETION_POINTS: i32 = 200;

pub const PUBLISHED_MENU_KEY: &str = "published_menu";
pub const ACTIVE_SNAPSHOT_KEY: &str = "active_published_menu";

#[derive(Debug, Serialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct ConversionFunnel {
    pub page_views: i64,
    pub reservation_starts: i64,
    pub reservation_submits: i64,
    pub conversion_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct PageMetric {
    pub page: String,
    pub views: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsMetrics {
    pub unique_visitors: i64,
    pub total_page_views: i64,
    pub daily_page_views: Vec<DailyMetric>,
    pub conversion_funnel: ConversionFunnel,
    pub top_pages: Vec<PageMetric>,
}

#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub today_reservations: i64,
    pub pending_orders: i64,
    pub completed_orders_today: i64,
    pub revenue_today: i64,
    pub unread_notifications: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_is_linear() {
        use ReservationStatus::*;

        assert!(Pending.can_become(Confirmed));
        assert!(Confirmed.can_become(Arrived));
        assert!(Arrived.can_become(Completed));

        assert!(!Pending.can_become(Arrived));
        assert!(!Pending.can_become(Completed));
        assert!(!Confirmed.can_become(Completed));
        assert!(!Completed.can_become(Confirmed));
        assert!(!Arrived.can_become(Confirmed));
    }

    #[test]
    fn cancel_only_from_non_terminal() {
        use ReservationStatus::*;

        assert!(Pending.can_become(Cancelled));
        assert!(Confirmed.can_become(Cancelled));
        assert!(Arrived.can_become(Cancelled));
        assert!(!Completed.can_become(Cancelled));
        assert!(!Cancelled.can_become(Cancelled));
    }

    #[test]
    fn competing_transitions_lose_after_a_terminal_write() {
        use ReservationStatus::*;

        // Both are legal from `arrived`, but whichever commits first wins:
        // the loser re-reads the terminal status and must be rejected.
        assert!(Arrived.can_become(Completed));
        assert!(Arrived.can_become(Cancelled));
        assert!(!Completed.can_become(Cancelled));
        assert!(!Cancelled.can_become(Completed));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for raw in ["pending", "confirmed", "arrived", "completed", "cancelled"] {
            let status = ReservationStatus::parse(raw).unwrap();
            assert_eq!(status.as_str(), raw);
        }
        assert!(ReservationStatus::parse("no-show").is_none());
    }

    #[test]
    fn role_gates() {
        assert!(!StaffRole::parse("worker").unwrap().is_manager());
        assert!(StaffRole::parse("admin").unwrap().is_manager());
        assert!(StaffRole::parse("owner").unwrap().is_manager());
        assert!(StaffRole::parse("chef").is_none());
    }
}
