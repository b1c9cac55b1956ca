use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::{AsChangeset, Insertable};
use serde::Serialize;

use crate::schema::analytics_events;
use crate::schema::dishes;
use crate::schema::footer_settings;
use crate::schema::kitchen_tickets;
use crate::schema::legal_pages;
use crate::schema::loyalty_accounts;
use crate::schema::loyalty_transactions;
use crate::schema::notifications;
use crate::schema::order_items;
use crate::schema::orders;
use crate::schema::reservations;
use crate::schema::staff_activity;
use crate::schema::visitors;

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = reservations)]
pub struct NewReservation {
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

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = dishes)]
pub struct NewDish {
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

/// Partial dish update; `None` leaves the column untouched.
#[derive(AsChangeset, Clone, Default)]
#[diesel(table_name = dishes)]
pub struct DishChangeset {
    pub name: Option<String>,
    pub short_desc: Option<String>,
    pub full_desc: Option<String>,
    pub price: Option<i32>,
    pub currency: Option<String>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = orders)]
pub struct NewOrder {
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

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = order_items)]
pub struct NewOrderItem {
    pub order_id: i64,
    pub dish_id: Option<i64>,
    pub item_name: String,
    pub quantity: i32,
    pub unit_price: i32,
    pub total_price: i32,
    pub special_instructions: Option<String>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = kitchen_tickets)]
pub struct NewKitchenTicket {
    pub order_id: i64,
    pub order_number: String,
    pub customer_name: String,
    pub items: serde_json::Value,
    pub status: String,
    pub priority: String,
    pub special_instructions: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = loyalty_accounts)]
pub struct NewLoyaltyAccount {
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

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = loyalty_transactions)]
pub struct NewLoyaltyTransaction {
    pub account_id: i64,
    pub entry_type: String,
    pub points: i32,
    pub reason: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = legal_pages)]
pub struct NewLegalPage {
    pub page_type: String,
    pub title: String,
    pub sections: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Full-replace form; `PUT /content/footer` always carries the whole row.
#[derive(Insertable, AsChangeset, Serialize, Clone)]
#[diesel(table_name = footer_settings)]
#[diesel(treat_none_as_null = true)]
pub struct FooterSettingsForm {
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

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = notifications)]
pub struct NewNotification {
    pub kind: String,
    pub title: String,
    pub message: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = staff_activity)]
pub struct NewStaffActivity {
    pub staff_id: Option<i64>,
    pub staff_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = analytics_events)]
pub struct NewAnalyticsEvent {
    pub visitor_id: String,
    pub event_name: String,
    pub event_props: serde_json::Value,
    pub url: Option<String>,
    pub referrer: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Serialize, Clone)]
#[diesel(table_name = visitors)]
pub struct NewVisitor {
    pub visitor_id: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub device_meta: serde_json::Value,
}
