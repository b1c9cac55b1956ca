use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, HttpRequest, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::result::Error as DieselError;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::services::auth::{log_activity, staff_from_request};
use crate::services::db_models::{Reservation, StaffUser};
use crate::services::db_utils::AppState;
use crate::services::insertable::NewReservation;
use crate::services::messages::{
    AwardPoints, CreateReservation, FetchReservations, TransitionOutcome, TransitionReservation,
};
use crate::types::{ReservationStatus, DEFAULT_COMPLETION_POINTS};

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

#[derive(Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[get("/all")]
pub async fn fetch_reservations(state: Data<AppState>, params: Query<ListParams>) -> impl Responder {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);
    let status = params
        .status
        .clone()
        .filter(|wanted| wanted != "all" && !wanted.is_empty());

    match state.pg_db.send(FetchReservations { status, limit, offset }).await {
        Ok(Ok(resp)) => {
            let has_more = resp.len() as i64 == limit;
            HttpResponse::Ok().json(json!({
                "success": true,
                "reservations": resp,
                "total": resp.len(),
                "pagination": { "offset": offset, "limit": limit, "has_more": has_more },
            }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError()
            .json(format!("Failed to fetch reservations: {err}")),
        Err(err) => HttpResponse::InternalServerError()
            .json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct CreateReservationBody {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub party_size: Option<i32>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub table_number: Option<i32>,
    pub special_requests: Option<String>,
}

#[post("/add")]
pub async fn add_reservation(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<CreateReservationBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let mut missing = vec![];
    if body.customer_name.as_deref().unwrap_or("").is_empty() {
        missing.push("customer_name");
    }
    if body.party_size.unwrap_or(0) < 1 {
        missing.push("party_size");
    }
    let date = body.date.as_deref().and_then(parse_date);
    if date.is_none() {
        missing.push("date");
    }
    let time = body.time.as_deref().and_then(parse_time);
    if time.is_none() {
        missing.push("time");
    }
    if !missing.is_empty() {
        return HttpResponse::BadRequest()
            .json(format!("Missing or invalid fields: {}", missing.join(", ")));
    }

    let now = Utc::now();
    let new_reservation = NewReservation {
        customer_name: body.customer_name.clone().unwrap_or_default(),
        customer_email: body.customer_email.clone(),
        customer_phone: body.customer_phone.clone(),
        party_size: body.party_size.unwrap_or(1),
        reservation_date: date.unwrap_or_default(),
        reservation_time: time.unwrap_or_default(),
        table_number: body.table_number,
        special_requests: body.special_requests.clone(),
        status: ReservationStatus::Pending.as_str().to_owned(),
        source: "staff".to_owned(),
        created_by: Some(staff.id),
        created_by_name: Some(staff.full_name()),
        created_at: now,
        updated_at: now,
    };

    match state.pg_db.send(CreateReservation(new_reservation)).await {
        Ok(Ok(reservation)) => {
            log_activity(
                &state,
                Some(&staff),
                "create_reservation",
                "reservation",
                Some(reservation.id),
                json!({
                    "customer_name": reservation.customer_name,
                    "party_size": reservation.party_size,
                    "reservation_date": reservation.reservation_date,
                    "reservation_time": reservation.reservation_time,
                }),
            )
            .await;

            HttpResponse::Ok().json(json!({
                "success": true,
                "message": "Reservation created successfully",
                "reservation": reservation,
            }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError()
            .json(format!("Failed to create reservation: {err}")),
        Err(err) => HttpResponse::InternalServerError()
            .json(format!("Unable to perform action: {err}")),
    }
}

enum TransitionReply {
    Done(Reservation),
    Failed(HttpResponse),
}

async fn run_transition(
    state: &Data<AppState>,
    staff: &StaffUser,
    msg: TransitionReservation,
    action: &str,
) -> TransitionReply {
    let id = msg.id;
    let target = msg.new_status;

    match state.pg_db.send(msg).await {
        Ok(Ok(TransitionOutcome::Updated(reservation))) => {
            log_activity(
                state,
                Some(staff),
                action,
                "reservation",
                Some(reservation.id),
                json!({
                    "customer_name": reservation.customer_name,
                    "reservation_date": reservation.reservation_date,
                    "reservation_time": reservation.reservation_time,
                    "new_status": reservation.status,
                }),
            )
            .await;
            TransitionReply::Done(reservation)
        }
        Ok(Ok(TransitionOutcome::Rejected { current })) => TransitionReply::Failed(
            HttpResponse::Conflict().json(format!(
                "Reservation {id} cannot become '{target}' from status '{current}'"
            )),
        ),
        Ok(Err(DieselError::NotFound)) => {
            TransitionReply::Failed(HttpResponse::NotFound().json("Reservation not found"))
        }
        Ok(Err(err)) => TransitionReply::Failed(
            HttpResponse::InternalServerError()
                .json(format!("Failed to update reservation: {err}")),
        ),
        Err(err) => TransitionReply::Failed(
            HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
        ),
    }
}

fn transition_response(message: &str, reservation: &Reservation) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "reservation": {
            "id": reservation.id,
            "status": reservation.status,
            "table_number": reservation.table_number,
            "updated_at": reservation.updated_at,
        },
    }))
}

#[post("/{id}/confirm")]
pub async fn confirm_reservation(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<i64>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let msg = TransitionReservation {
        id: path.into_inner(),
        new_status: ReservationStatus::Confirmed,
        table_number: None,
        cancel_reason: None,
    };
    match run_transition(&state, &staff, msg, "confirm_reservation").await {
        TransitionReply::Done(reservation) => {
            transition_response("Reservation confirmed successfully", &reservation)
        }
        TransitionReply::Failed(resp) => resp,
    }
}

#[derive(Deserialize, Default)]
pub struct ArriveBody {
    pub table_number: Option<i32>,
}

#[post("/{id}/arrive")]
pub async fn mark_arrived(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<i64>,
    body: Option<Json<ArriveBody>>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let msg = TransitionReservation {
        id: path.into_inner(),
        new_status: ReservationStatus::Arrived,
        table_number: body.and_then(|b| b.table_number),
        cancel_reason: None,
    };
    match run_transition(&state, &staff, msg, "mark_reservation_arrived").await {
        TransitionReply::Done(reservation) => {
            transition_response("Customer marked as arrived", &reservation)
        }
        TransitionReply::Failed(resp) => resp,
    }
}

#[derive(Deserialize, Default)]
pub struct CompleteBody {
    pub loyalty_points: Option<i32>,
}

#[post("/{id}/complete")]
pub async fn mark_completed(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<i64>,
    body: Option<Json<CompleteBody>>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let points = body
        .and_then(|b| b.loyalty_points)
        .unwrap_or(DEFAULT_COMPLETION_POINTS);

    let msg = TransitionReservation {
        id: path.into_inner(),
        new_status: ReservationStatus::Completed,
        table_number: None,
        cancel_reason: None,
    };
    let reservation = match run_transition(&state, &staff, msg, "complete_reservation").await {
        TransitionReply::Done(reservation) => reservation,
        TransitionReply::Failed(resp) => return resp,
    };

    // Awarding points must never undo a completed visit.
    let mut loyalty = None;
    if reservation.customer_email.is_some() || reservation.customer_phone.is_some() {
        let award = AwardPoints {
            user_ref: None,
            email: reservation.customer_email.clone(),
            phone: reservation.customer_phone.clone(),
            points,
            reason: "Completed reservation".to_owned(),
            reference_type: Some("reservation".to_owned()),
            reference_id: Some(reservation.id),
            staff_id: Some(staff.id),
            metadata: json!({
                "customer_name": reservation.customer_name,
                "reservation_date": reservation.reservation_date,
                "party_size": reservation.party_size,
            }),
        };

        match state.pg_db.send(award).await {
            Ok(Ok(outcome)) => {
                loyalty = Some(json!({
                    "points_awarded": points,
                    "new_balance": outcome.new_balance,
                }))
            }
            Ok(Err(err)) => warn!(
                reservation_id = reservation.id,
                "failed to award loyalty points: {err}"
            ),
            Err(err) => warn!(
                reservation_id = reservation.id,
                "loyalty actor unavailable: {err}"
            ),
        }
    }

    let mut response = json!({
        "success": true,
        "message": "Reservation completed successfully",
        "reservation": {
            "id": reservation.id,
            "status": reservation.status,
            "updated_at": reservation.updated_at,
        },
    });
    if let Some(loyalty) = loyalty {
        response["loyalty"] = loyalty;
    }

    HttpResponse::Ok().json(response)
}

#[derive(Deserialize, Default)]
pub struct CancelBody {
    pub reason: Option<String>,
    pub notify_customer: Option<bool>,
}

#[post("/{id}/cancel")]
pub async fn cancel_reservation(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<i64>,
    body: Option<Json<CancelBody>>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let (reason, notify_customer) = body
        .map(|b| (b.reason.clone(), b.notify_customer.unwrap_or(false)))
        .unwrap_or((None, false));

    let msg = TransitionReservation {
        id: path.into_inner(),
        new_status: ReservationStatus::Cancelled,
        table_number: None,
        cancel_reason: reason.clone(),
    };
    match run_transition(&state, &staff, msg, "cancel_reservation").await {
        TransitionReply::Done(reservation) => {
            // TODO: send the cancellation email once the mail service exists.
            if notify_customer {
                if let Some(email) = &reservation.customer_email {
                    tracing::info!(
                        reservation_id = reservation.id,
                        "customer notification requested for {email}"
                    );
                }
            }
            transition_response("Reservation cancelled successfully", &reservation)
        }
        TransitionReply::Failed(resp) => resp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_and_times_parse_the_portal_formats() {
        assert_eq!(
            parse_date("2026-08-30"),
            NaiveDate::from_ymd_opt(2026, 8, 30)
        );
        assert!(parse_date("30/08/2026").is_none());

        assert_eq!(parse_time("19:30"), NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(parse_time("19:30:15"), NaiveTime::from_hms_opt(19, 30, 15));
        assert!(parse_time("7pm").is_none());
    }
}
