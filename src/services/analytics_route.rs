use actix_web::web::{Data, Json, Query};
use actix_web::{get, post, HttpRequest, HttpResponse, Responder};
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::services::auth::{require_manager, staff_from_request};
use crate::services::db_utils::AppState;
use crate::services::messages::{
    FetchAnalyticsMetrics, FetchDashboardMetrics, IncomingEvent, RecordAnalyticsBatch,
};

#[derive(Deserialize)]
pub struct EventBody {
    pub event_name: Option<String>,
    pub event_props: Option<Value>,
    pub url: Option<String>,
    pub referrer: Option<String>,
    /// Milliseconds since the epoch, as the tracking script sends it.
    pub timestamp: Option<i64>,
}

#[derive(Deserialize)]
pub struct BatchBody {
    pub visitor_id: Option<String>,
    pub visitor_meta: Option<Value>,
    pub events: Option<Vec<EventBody>>,
}

#[post("/batch")]
pub async fn record_batch(state: Data<AppState>, body: Json<BatchBody>) -> impl Responder {
    let body = body.into_inner();
    let Some(visitor_id) = body.visitor_id.filter(|id| !id.is_empty()) else {
        return HttpResponse::BadRequest().json("visitor_id is required");
    };
    let Some(events) = body.events.filter(|events| !events.is_empty()) else {
        return HttpResponse::BadRequest().json("events must be a non-empty array");
    };

    let events: Vec<IncomingEvent> = events
        .into_iter()
        .filter(|event| event.event_name.as_deref().is_some_and(|n| !n.is_empty()))
        .map(|event| IncomingEvent {
            event_name: event.event_name.unwrap_or_default(),
            event_props: event.event_props.unwrap_or_else(|| json!({})),
            url: event.url,
            referrer: event.referrer,
            timestamp: event
                .timestamp
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        })
        .collect();
    if events.is_empty() {
        return HttpResponse::BadRequest().json("events must contain at least one named event");
    }

    let msg = RecordAnalyticsBatch {
        visitor_id,
        visitor_meta: body.visitor_meta,
        events,
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(stored)) => HttpResponse::Ok().json(json!({ "success": true, "stored": stored })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to record events: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct MetricsParams {
    pub days: Option<i64>,
}

#[get("/metrics")]
pub async fn fetch_metrics(
    req: HttpRequest,
    state: Data<AppState>,
    params: Query<MetricsParams>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    if let Err(resp) = require_manager(&staff) {
        return resp;
    }

    let msg = FetchAnalyticsMetrics {
        days: params.days.unwrap_or(30),
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(metrics)) => HttpResponse::Ok().json(json!({ "success": true, "metrics": metrics })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch metrics: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[get("/dashboard")]
pub async fn fetch_dashboard(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    if let Err(resp) = staff_from_request(&req, &state).await.map(|_| ()) {
        return resp;
    }

    match state.pg_db.send(FetchDashboardMetrics).await {
        Ok(Ok(metrics)) => HttpResponse::Ok().json(json!({ "success": true, "dashboard": metrics })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch dashboard: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}
