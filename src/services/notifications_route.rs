use actix_web::web::{Data, Json};
use actix_web::{get, put, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::services::db_utils::AppState;
use crate::services::messages::{FetchUnreadNotifications, MarkNotificationRead};

#[get("/unread")]
pub async fn fetch_unread(state: Data<AppState>) -> impl Responder {
    match state.pg_db.send(FetchUnreadNotifications).await {
        Ok(Ok(resp)) => HttpResponse::Ok().json(json!({
            "notifications": resp,
            "unread_count": resp.len(),
        })),
        Ok(Err(err)) => HttpResponse::InternalServerError()
            .json(format!("Failed to fetch notifications: {err}")),
        Err(err) => HttpResponse::InternalServerError()
            .json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct MarkReadBody {
    pub notification_id: i64,
}

#[put("/read")]
pub async fn mark_read(state: Data<AppState>, body: Json<MarkReadBody>) -> impl Responder {
    match state.pg_db.send(MarkNotificationRead(body.notification_id)).await {
        Ok(Ok(0)) => HttpResponse::NotFound().json("Notification not found"),
        Ok(Ok(_)) => HttpResponse::Ok().json(json!({ "success": true })),
        Ok(Err(err)) => HttpResponse::InternalServerError()
            .json(format!("Failed to mark notification as read: {err}")),
        Err(err) => HttpResponse::InternalServerError()
            .json(format!("Unable to perform action: {err}")),
    }
}
