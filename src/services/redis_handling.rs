use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::db_models::{Dish, DishCategory};
use crate::types::ACTIVE_SNAPSHOT_KEY;
use crate::types::PUBLISHED_MENU_KEY;

/// The customer-facing menu snapshot, frozen at publish time.
#[derive(Debug, Serialize)]
pub struct PublishedMenu {
    pub published_at: DateTime<Utc>,
    pub categories: Vec<DishCategory>,
    pub dishes: Vec<Dish>,
}

pub fn put_published_menu(db: &redis::Client, snapshot: &PublishedMenu) -> Result<String, String> {
    let snapshot_json = match serde_json::to_string(snapshot) {
        Ok(json) => json,
        Err(_) => return Err("Failed to compose JSON object of menu snapshot".into()),
    };

    let mut conn = match db.get_connection() {
        Ok(conn) => conn,
        Err(_) => return Err("Failed to establish connection with redis".into()),
    };

    let snapshot_key = format!("{PUBLISHED_MENU_KEY}_{}", snapshot.published_at.date_naive());

    redis::cmd("SET")
        .arg(&snapshot_key)
        .arg(snapshot_json)
        .execute(&mut conn);

    redis::cmd("SET")
        .arg(ACTIVE_SNAPSHOT_KEY)
        .arg(&snapshot_key)
        .execute(&mut conn);

    Ok(snapshot_key)
}

pub fn get_published_menu(db: &redis::Client) -> Result<String, String> {
    let mut conn = match db.get_connection() {
        Ok(conn) => conn,
        Err(_) => return Err("Failed to establish connection with redis".into()),
    };

    match redis::cmd("GET").arg(ACTIVE_SNAPSHOT_KEY).query::<String>(&mut conn) {
        Ok(snapshot_key) => {
            match redis::cmd("GET").arg(snapshot_key).query::<String>(&mut conn) {
                Ok(snapshot_json) => Ok(snapshot_json),
                Err(_) => Err("Failed to get menu snapshot from redis db".into()),
            }
        }
        Err(_) => Err("No menu snapshot has been published".into()),
    }
}
