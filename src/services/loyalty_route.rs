use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, post, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

use crate::services::auth::{log_activity, require_manager, staff_from_request};
use crate::services::db_utils::AppState;
use crate::services::messages::{
    AdjustOutcome, AdjustPoints, AwardPoints, FetchLoyaltyAccount, LoyaltyLookup,
};
use crate::types::ADJUSTMENT_TYPES;

#[derive(Deserialize)]
pub struct AwardBody {
    pub user_ref: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub points: Option<i32>,
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub metadata: Option<serde_json::Value>,
}

#[post("/award")]
pub async fn award_points(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<AwardBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let points = body.points.unwrap_or(0);
    let reason = body.reason.clone().unwrap_or_default();
    if points <= 0 || reason.is_empty() {
        return HttpResponse::BadRequest().json("Points and reason are required");
    }
    if body.user_ref.is_none() && body.email.is_none() && body.phone.is_none() {
        return HttpResponse::BadRequest()
            .json("User identifier required (user_ref, email, or phone)");
    }

    let msg = AwardPoints {
        user_ref: body.user_ref.clone(),
        email: body.email.clone(),
        phone: body.phone.clone(),
        points,
        reason: reason.clone(),
        reference_type: body.reference_type.clone(),
        reference_id: body.reference_id,
        staff_id: Some(staff.id),
        metadata: body.metadata.clone().unwrap_or_else(|| json!({})),
    };

    match state.pg_db.send(msg).await {
        Ok(Ok(outcome)) => {
            log_activity(
                &state,
                Some(&staff),
                "award_loyalty_points",
                "loyalty_transaction",
                Some(outcome.transaction_id),
                json!({ "points": points, "reason": reason }),
            )
            .await;
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": format!("Successfully awarded {points} points"),
                "transaction_id": outcome.transaction_id,
                "account_id": outcome.account_id,
                "new_balance": outcome.new_balance,
            }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to award points: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct LookupParams {
    #[serde(rename = "type")]
    pub lookup_type: Option<String>,
}

#[get("/account/{key}")]
pub async fn fetch_account(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<String>,
    params: Query<LookupParams>,
) -> impl Responder {
    if let Err(resp) = staff_from_request(&req, &state).await.map(|_| ()) {
        return resp;
    }

    let lookup = match params.lookup_type.as_deref() {
        Some("email") => LoyaltyLookup::Email,
        Some("phone") => LoyaltyLookup::Phone,
        _ => LoyaltyLookup::UserRef,
    };

    let msg = FetchLoyaltyAccount {
        key: path.into_inner(),
        lookup,
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(Some((account, ledger)))) => {
            let earned: i64 = ledger
                .iter()
                .filter(|t| t.entry_type == "earn")
                .map(|t| t.points as i64)
                .sum();
            let redeemed: i64 = ledger
                .iter()
                .filter(|t| t.entry_type == "redeem" || t.entry_type == "expire")
                .map(|t| (t.points as i64).abs())
                .sum();

            HttpResponse::Ok().json(json!({
                "account": account,
                "transactions": ledger,
                "summary": {
                    "current_balance": account.points,
                    "total_earned": earned,
                    "total_redeemed": redeemed,
                    "total_transactions": ledger.len(),
                    "tier": account.tier,
                },
            }))
        }
        Ok(Ok(None)) => HttpResponse::Ok().json(json!({
            "account": null,
            "transactions": [],
            "message": "No loyalty account found",
        })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch loyalty account: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct AdjustBody {
    pub points: Option<i32>,
    pub reason: Option<String>,
    pub adjustment_type: Option<String>,
}

#[post("/account/{key}/adjust")]
pub async fn adjust_points(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<String>,
    body: Json<AdjustBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    if let Err(resp) = require_manager(&staff) {
        return resp;
    }

    let points = body.points.unwrap_or(0);
    let reason = body.reason.clone().unwrap_or_default();
    let entry_type = body.adjustment_type.clone().unwrap_or_default();
    if points == 0 || reason.is_empty() || entry_type.is_empty() {
        return HttpResponse::BadRequest()
            .json("Points, reason, and adjustment type are required");
    }
    if !ADJUSTMENT_TYPES.contains(&entry_type.as_str()) {
        return HttpResponse::BadRequest()
            .json("Invalid adjustment type. Must be earn, redeem, or adjust");
    }

    let msg = AdjustPoints {
        user_ref: path.into_inner(),
        entry_type: entry_type.clone(),
        points,
        reason,
        staff_id: staff.id,
        staff_name: staff.full_name(),
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(AdjustOutcome::Adjusted { transaction, new_balance })) => {
            log_activity(
                &state,
                Some(&staff),
                "manual_loyalty_adjustment",
                "loyalty_transaction",
                Some(transaction.id),
                json!({ "points": transaction.points, "adjustment_type": entry_type }),
            )
            .await;
            let verb = if entry_type == "redeem" { "deducted" } else { "added" };
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": format!("Successfully {verb} {} points", transaction.points.abs()),
                "transaction": transaction,
                "new_balance": new_balance,
            }))
        }
        Ok(Ok(AdjustOutcome::NoAccount)) => HttpResponse::NotFound().json("Loyalty account not found"),
        Ok(Ok(AdjustOutcome::InsufficientPoints { balance })) => HttpResponse::BadRequest()
            .json(format!("Insufficient points. Current balance: {balance}")),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to adjust points: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}
