use actix::Message;
use diesel::QueryResult;
use serde::Serialize;

use crate::services::db_models::{
    Dish, DishCategory, FooterSettings, LegalPage, LoyaltyAccount, LoyaltyTransaction,
    Notification, Reservation, StaffUser,
};
use crate::services::insertable::{
    DishChangeset, FooterSettingsForm, NewDish, NewOrder, NewOrderItem, NewReservation,
};
use crate::types::{AnalyticsMetrics, DashboardMetrics, ReservationStatus};

// ---------- staff / audit ----------

#[derive(Message)]
#[rtype(result = "QueryResult<StaffUser>")]
pub struct FetchStaffByToken(pub String);

#[derive(Message)]
#[rtype(result = "QueryResult<()>")]
pub struct RecordStaffActivity {
    pub staff_id: Option<i64>,
    pub staff_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub details: serde_json::Value,
}

// ---------- reservations ----------

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Reservation>>")]
pub struct FetchReservations {
    pub status: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Reservation>")]
pub struct CreateReservation(pub NewReservation);

/// Outcome of a guarded status change. `Rejected` carries the status the row
/// actually had, so the route can answer with a conflict instead of a 500.
#[derive(Debug)]
pub enum TransitionOutcome {
    Updated(Reservation),
    Rejected { current: String },
}

#[derive(Message)]
#[rtype(result = "QueryResult<TransitionOutcome>")]
pub struct TransitionReservation {
    pub id: i64,
    pub new_status: ReservationStatus,
    pub table_number: Option<i32>,
    pub cancel_reason: Option<String>,
}

// ---------- menu ----------

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Dish>>")]
pub struct FetchDishes {
    pub only_available: bool,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Dish>")]
pub struct FetchDish(pub i64);

#[derive(Message)]
#[rtype(result = "QueryResult<Dish>")]
pub struct CreateDish(pub NewDish);

#[derive(Message)]
#[rtype(result = "QueryResult<Dish>")]
pub struct UpdateDish {
    pub id: i64,
    pub changes: DishChangeset,
}

#[derive(Message)]
#[rtype(result = "QueryResult<usize>")]
pub struct DeleteDish(pub i64);

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<DishCategory>>")]
pub struct FetchCategories;

// ---------- loyalty ----------

#[derive(Debug, Serialize)]
pub struct AwardOutcome {
    pub transaction_id: i64,
    pub account_id: i64,
    pub new_balance: i32,
}

#[derive(Message)]
#[rtype(result = "QueryResult<AwardOutcome>")]
pub struct AwardPoints {
    pub user_ref: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub points: i32,
    pub reason: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Copy)]
pub enum LoyaltyLookup {
    UserRef,
    Email,
    Phone,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Option<(LoyaltyAccount, Vec<LoyaltyTransaction>)>>")]
pub struct FetchLoyaltyAccount {
    pub key: String,
    pub lookup: LoyaltyLookup,
}

#[derive(Debug)]
pub enum AdjustOutcome {
    Adjusted {
        transaction: LoyaltyTransaction,
        new_balance: i32,
    },
    NoAccount,
    InsufficientPoints { balance: i32 },
}

#[derive(Message)]
#[rtype(result = "QueryResult<AdjustOutcome>")]
pub struct AdjustPoints {
    pub user_ref: String,
    pub entry_type: String,
    pub points: i32,
    pub reason: String,
    pub staff_id: i64,
    pub staff_name: String,
}

// ---------- content ----------

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<LegalPage>>")]
pub struct FetchLegalPages;

#[derive(Message)]
#[rtype(result = "QueryResult<LegalPage>")]
pub struct UpsertLegalPage {
    pub page_type: String,
    pub title: String,
    pub sections: serde_json::Value,
}

#[derive(Message)]
#[rtype(result = "QueryResult<Option<FooterSettings>>")]
pub struct FetchFooter;

#[derive(Message)]
#[rtype(result = "QueryResult<FooterSettings>")]
pub struct UpsertFooter(pub FooterSettingsForm);

#[derive(Debug, Serialize)]
pub struct InitReport {
    pub footer_created: bool,
    pub legal_pages_created: usize,
}

#[derive(Message)]
#[rtype(result = "QueryResult<InitReport>")]
pub struct InitializeContent;

// ---------- notifications ----------

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Notification>>")]
pub struct FetchUnreadNotifications;

#[derive(Message)]
#[rtype(result = "QueryResult<usize>")]
pub struct MarkNotificationRead(pub i64);

#[derive(Message)]
#[rtype(result = "QueryResult<()>")]
pub struct PushNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
}

// ---------- webhook order ingestion ----------

#[derive(Message)]
#[rtype(result = "QueryResult<i64>")]
pub struct IngestWebsiteOrder {
    pub order: NewOrder,
    pub items: Vec<NewOrderItem>,
    pub ticket_items: serde_json::Value,
    pub special_instructions: Option<String>,
}

// ---------- analytics ----------

pub struct IncomingEvent {
    pub event_name: String,
    pub event_props: serde_json::Value,
    pub url: Option<String>,
    pub referrer: Option<String>,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Message)]
#[rtype(result = "QueryResult<usize>")]
pub struct RecordAnalyticsBatch {
    pub visitor_id: String,
    pub visitor_meta: Option<serde_json::Value>,
    pub events: Vec<IncomingEvent>,
}

#[derive(Message)]
#[rtype(result = "QueryResult<AnalyticsMetrics>")]
pub struct FetchAnalyticsMetrics {
    pub days: i64,
}

#[derive(Message)]
#[rtype(result = "QueryResult<DashboardMetrics>")]
pub struct FetchDashboardMetrics;
