use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::Queryable;
use serde::Serialize;

use crate::types::{ReservationStatus, StaffRole};

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub party_size: i32,
    pub reservation_date: NaiveDate,
    pub reservation_time: NaiveTime,
    pub table_number: Option<i32>,
    pub special_requests: Option<String>,
    pub status: String,
    pub source: String,
    pub created_by: Option<i64>,
    pub created_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn status(&self) -> Option<ReservationStatus> {
        ReservationStatus::parse(&self.status)
    }
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct DishCategory {
    pub id: i64,
    pub name: String,
    pub order_index: i32,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub short_desc: Option<String>,
    pub full_desc: Option<String>,
    pub price: i32,
    pub currency: String,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Debug, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub order_type: String,
    pub delivery_address: Option<String>,
    pub status: String,
    pub subtotal: i32,
    pub tax_amount: i32,
    pub delivery_fee: i32,
    pub total_amount: i32,
    pub payment_status: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Debug, Serialize)]
pub struct LoyaltyAccount {
    pub id: i64,
    pub user_ref: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub points: i32,
    pub tier: String,
    pub total_earned: i32,
    pub total_redeemed: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Debug, Serialize)]
pub struct LoyaltyTransaction {
    pub id: i64,
    pub account_id: i64,
    pub entry_type: String,
    pub points: i32,
    pub reason: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Queryable, Debug, Serialize)]
pub struct LegalPage {
    pub id: i64,
    pub page_type: String,
    pub title: String,
    pub sections: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Debug, Serialize)]
pub struct FooterSettings {
    pub id: i64,
    pub company_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub dining_hours: Option<String>,
    pub dining_location: Option<String>,
    pub social_links: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Debug, Serialize)]
pub struct Notification {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Queryable, Debug, Clone, Serialize)]
pub struct StaffUser {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(skip)]
    pub api_token: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl StaffUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn role(&self) -> Option<StaffRole> {
        StaffRole::parse(&self.role)
    }
}
