use actix_web::http::header;
use actix_web::web::Data;
use actix_web::{HttpRequest, HttpResponse};
use tracing::warn;

use crate::services::db_models::StaffUser;
use crate::services::db_utils::AppState;
use crate::services::messages::{FetchStaffByToken, RecordStaffActivity};

/// Resolves the `Authorization: Bearer <token>` header to an active staff
/// user. The error side is the ready-to-send response.
pub async fn staff_from_request(
    req: &HttpRequest,
    state: &Data<AppState>,
) -> Result<StaffUser, HttpResponse> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        return Err(HttpResponse::Unauthorized().json("Staff authentication required"));
    };

    match state.pg_db.send(FetchStaffByToken(token.to_owned())).await {
        Ok(Ok(staff)) => Ok(staff),
        Ok(Err(_)) => Err(HttpResponse::Unauthorized().json("Unknown or inactive staff token")),
        Err(_) => Err(HttpResponse::InternalServerError().json("Unable to verify staff token")),
    }
}

pub fn require_manager(staff: &StaffUser) -> Result<(), HttpResponse> {
    let is_manager = staff.role().map(|role| role.is_manager()).unwrap_or(false);
    if is_manager {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json("Admin access required"))
    }
}

/// Best-effort audit trail; a failed insert is logged and forgotten.
pub async fn log_activity(
    state: &Data<AppState>,
    staff: Option<&StaffUser>,
    action: &str,
    entity_type: &str,
    entity_id: Option<i64>,
    details: serde_json::Value,
) {
    let record = RecordStaffActivity {
        staff_id: staff.map(|s| s.id),
        staff_name: staff.map(|s| s.full_name()).unwrap_or_else(|| "System".to_owned()),
        action: action.to_owned(),
        entity_type: entity_type.to_owned(),
        entity_id,
        details,
    };

    match state.pg_db.send(record).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(action, "failed to record staff activity: {err}"),
        Err(err) => warn!(action, "staff activity actor unavailable: {err}"),
    }
}
