use actix_web::web::{Bytes, Data};
use actix_web::{post, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use crate::services::db_utils::AppState;
use crate::services::insertable::{NewOrder, NewOrderItem, NewReservation};
use crate::services::messages::{CreateReservation, IngestWebsiteOrder, PushNotification};
use crate::services::reservations_route::{parse_date, parse_time};
use crate::services::signature;
use crate::types::{PortalError, ReservationStatus};

fn verify_request(req: &HttpRequest, state: &Data<AppState>, body: &[u8]) -> Result<(), HttpResponse> {
    let Some(secret) = state.settings.webhook_secret.as_deref() else {
        return Err(HttpResponse::InternalServerError()
            .json(PortalError::WebhookSecretMissing.to_string()));
    };

    let Some(provided) = req
        .headers()
        .get("x-webhook-signature")
        .and_then(|value| value.to_str().ok())
    else {
        return Err(HttpResponse::Unauthorized().json(PortalError::SignatureMissing.to_string()));
    };

    signature::verify(secret, body, provided)
        .map_err(|err| HttpResponse::Unauthorized().json(err.to_string()))
}

fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn to_minor_units(amount: f64) -> i32 {
    (amount * 100.0).round() as i32
}

async fn notify_staff(state: &Data<AppState>, title: &str, message: String, metadata: Value) {
    let push = PushNotification {
        kind: "info".to_owned(),
        title: title.to_owned(),
        message,
        metadata,
    };
    match state.pg_db.send(push).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!("failed to create staff notification: {err}"),
        Err(err) => warn!("notification actor unavailable: {err}"),
    }
}

#[post("/reservation")]
pub async fn ingest_reservation(
    req: HttpRequest,
    state: Data<AppState>,
    body: Bytes,
) -> impl Responder {
    if let Err(resp) = verify_request(&req, &state, &body) {
        return resp;
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return HttpResponse::BadRequest().json("Body is not valid JSON"),
    };

    for field in [
        "customer_name",
        "customer_email",
        "party_size",
        "reservation_date",
        "reservation_time",
    ] {
        if payload.get(field).map(Value::is_null).unwrap_or(true) {
            return HttpResponse::BadRequest().json(format!("Missing required field: {field}"));
        }
    }

    let Some(date) = str_field(&payload, "reservation_date").and_then(parse_date) else {
        return HttpResponse::BadRequest().json("reservation_date must be YYYY-MM-DD");
    };
    let Some(time) = str_field(&payload, "reservation_time").and_then(parse_time) else {
        return HttpResponse::BadRequest().json("reservation_time must be HH:MM");
    };
    let party_size = payload
        .get("party_size")
        .and_then(Value::as_i64)
        .unwrap_or(0) as i32;
    if party_size < 1 {
        return HttpResponse::BadRequest().json("party_size must be a positive number");
    }

    let now = Utc::now();
    let customer_name = str_field(&payload, "customer_name").unwrap_or_default().to_owned();
    let new_reservation = NewReservation {
        customer_name: customer_name.clone(),
        customer_email: str_field(&payload, "customer_email").map(str::to_owned),
        customer_phone: str_field(&payload, "customer_phone").map(str::to_owned),
        party_size,
        reservation_date: date,
        reservation_time: time,
        // Table is assigned by staff once the party arrives.
        table_number: None,
        special_requests: str_field(&payload, "special_requests").map(str::to_owned),
        status: ReservationStatus::Confirmed.as_str().to_owned(),
        source: "website".to_owned(),
        created_by: None,
        created_by_name: None,
        created_at: now,
        updated_at: now,
    };

    match state.pg_db.send(CreateReservation(new_reservation)).await {
        Ok(Ok(reservation)) => {
            notify_staff(
                &state,
                "New Website Reservation",
                format!(
                    "New reservation for {customer_name} on {} at {}",
                    reservation.reservation_date, reservation.reservation_time
                ),
                json!({
                    "reservation_id": reservation.id,
                    "party_size": reservation.party_size,
                    "source": "website",
                }),
            )
            .await;

            HttpResponse::Ok().json(json!({
                "success": true,
                "reservation_id": reservation.id,
                "message": "Reservation created successfully",
            }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError()
            .json(format!("Failed to create reservation: {err}")),
        Err(err) => HttpResponse::InternalServerError()
            .json(format!("Unable to perform action: {err}")),
    }
}

#[post("/order")]
pub async fn ingest_order(req: HttpRequest, state: Data<AppState>, body: Bytes) -> impl Responder {
    if let Err(resp) = verify_request(&req, &state, &body) {
        return resp;
    }

    let payload: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(_) => return HttpResponse::BadRequest().json("Body is not valid JSON"),
    };

    for field in ["order_number", "customer_name", "customer_email", "items", "total"] {
        if payload.get(field).map(Value::is_null).unwrap_or(true) {
            return HttpResponse::BadRequest().json(format!("Missing required field: {field}"));
        }
    }

    let Some(raw_items) = payload.get("items").and_then(Value::as_array).filter(|a| !a.is_empty())
    else {
        return HttpResponse::BadRequest().json("items must be a non-empty array");
    };

    let items: Vec<NewOrderItem> = raw_items
        .iter()
        .map(|item| {
            let quantity = item.get("quantity").and_then(Value::as_i64).unwrap_or(1) as i32;
            let unit_price = to_minor_units(item.get("price").and_then(Value::as_f64).unwrap_or(0.0));
            NewOrderItem {
                // Replaced with the real id once the order row exists.
                order_id: 0,
                dish_id: item.get("menu_item_id").and_then(Value::as_i64),
                item_name: str_field(item, "name").unwrap_or("Unnamed item").to_owned(),
                quantity,
                unit_price,
                total_price: unit_price * quantity,
                special_instructions: str_field(item, "special_instructions").map(str::to_owned),
            }
        })
        .collect();

    let special_instructions = {
        let joined: Vec<&str> = raw_items
            .iter()
            .filter_map(|item| str_field(item, "special_instructions"))
            .collect();
        if joined.is_empty() {
            None
        } else {
            Some(joined.join("; "))
        }
    };

    let money = |key: &str| {
        to_minor_units(payload.get(key).and_then(Value::as_f64).unwrap_or(0.0))
    };
    let order_number = str_field(&payload, "order_number").unwrap_or_default().to_owned();
    let customer_name = str_field(&payload, "customer_name").unwrap_or_default().to_owned();
    let order_type = str_field(&payload, "order_type").unwrap_or("takeout").to_owned();

    let new_order = NewOrder {
        order_number: order_number.clone(),
        customer_name: customer_name.clone(),
        customer_email: str_field(&payload, "customer_email").unwrap_or_default().to_owned(),
        customer_phone: str_field(&payload, "customer_phone").map(str::to_owned),
        order_type: order_type.clone(),
        delivery_address: str_field(&payload, "delivery_address").map(str::to_owned),
        status: "pending".to_owned(),
        subtotal: money("subtotal"),
        tax_amount: money("tax"),
        delivery_fee: money("delivery_fee"),
        total_amount: money("total"),
        payment_status: str_field(&payload, "payment_status").unwrap_or("pending").to_owned(),
        source: "website".to_owned(),
        created_at: Utc::now(),
    };

    let msg = IngestWebsiteOrder {
        order: new_order,
        items,
        ticket_items: payload.get("items").cloned().unwrap_or(Value::Null),
        special_instructions,
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(order_id)) => {
            notify_staff(
                &state,
                "New Website Order",
                format!("New {order_type} order {order_number} from {customer_name}"),
                json!({
                    "order_id": order_id,
                    "order_number": order_number,
                    "source": "website",
                }),
            )
            .await;

            HttpResponse::Ok().json(json!({
                "success": true,
                "order_id": order_id,
                "message": "Order created successfully",
            }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to create order: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_stored_in_minor_units() {
        assert_eq!(to_minor_units(42.5), 4250);
        assert_eq!(to_minor_units(0.0), 0);
        assert_eq!(to_minor_units(19.99), 1999);
        assert_eq!(to_minor_units(10.004), 1000);
    }

    #[test]
    fn string_fields_reject_empty_values() {
        let payload = json!({ "name": "", "phone": "555-0123", "count": 3 });
        assert_eq!(str_field(&payload, "name"), None);
        assert_eq!(str_field(&payload, "phone"), Some("555-0123"));
        assert_eq!(str_field(&payload, "count"), None);
        assert_eq!(str_field(&payload, "missing"), None);
    }
}
