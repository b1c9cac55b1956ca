use actix_web::web::{Data, Json};
use actix_web::{get, post, put, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::services::auth::{log_activity, require_manager, staff_from_request};
use crate::services::db_utils::AppState;
use crate::services::insertable::FooterSettingsForm;
use crate::services::messages::{
    FetchDishes, FetchFooter, FetchLegalPages, InitializeContent, UpsertFooter, UpsertLegalPage,
};
use crate::services::redis_handling::get_published_menu;

pub const LEGAL_PAGE_TYPES: [&str; 3] = ["privacy", "terms", "accessibility"];

#[get("/legal")]
pub async fn fetch_legal_pages(state: Data<AppState>) -> impl Responder {
    match state.pg_db.send(FetchLegalPages).await {
        Ok(Ok(resp)) => HttpResponse::Ok().json(json!({ "legal_pages": resp })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch legal pages: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct LegalPageBody {
    #[serde(rename = "type")]
    pub page_type: String,
    pub title: String,
    pub sections: serde_json::Value,
}

#[put("/legal")]
pub async fn upsert_legal_page(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<LegalPageBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    if !LEGAL_PAGE_TYPES.contains(&body.page_type.as_str()) {
        return HttpResponse::BadRequest()
            .json("type must be one of privacy, terms, accessibility");
    }
    if !body.sections.is_array() {
        return HttpResponse::BadRequest().json("sections must be an array");
    }

    let msg = UpsertLegalPage {
        page_type: body.page_type.clone(),
        title: body.title.clone(),
        sections: body.sections.clone(),
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(page)) => {
            log_activity(
                &state,
                Some(&staff),
                "update_legal_page",
                "legal_page",
                Some(page.id),
                json!({ "type": page.page_type }),
            )
            .await;
            HttpResponse::Ok().json(json!({ "legal_page": page }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to save legal page: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[get("/footer")]
pub async fn fetch_footer(state: Data<AppState>) -> impl Responder {
    match state.pg_db.send(FetchFooter).await {
        Ok(Ok(resp)) => HttpResponse::Ok().json(json!({ "footer": resp })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch footer: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[derive(Deserialize)]
pub struct FooterBody {
    pub company_name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub dining_hours: Option<String>,
    pub dining_location: Option<String>,
    pub social_links: Option<serde_json::Value>,
}

#[put("/footer")]
pub async fn upsert_footer(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<FooterBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    if body.company_name.is_empty() {
        return HttpResponse::BadRequest().json("company_name is required");
    }

    let form = FooterSettingsForm {
        company_name: body.company_name.clone(),
        description: body.description.clone(),
        address: body.address.clone(),
        phone: body.phone.clone(),
        email: body.email.clone(),
        dining_hours: body.dining_hours.clone(),
        dining_location: body.dining_location.clone(),
        social_links: body.social_links.clone().unwrap_or_else(|| json!({})),
        updated_at: Utc::now(),
    };

    match state.pg_db.send(UpsertFooter(form)).await {
        Ok(Ok(footer)) => {
            log_activity(
                &state,
                Some(&staff),
                "update_footer",
                "footer_settings",
                Some(footer.id),
                json!({ "company_name": footer.company_name }),
            )
            .await;
            HttpResponse::Ok().json(json!({ "success": true, "footer": footer }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to save footer: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

/// The customer website's view: footer plus the published menu snapshot,
/// redis first with a database fallback.
#[get("/customer")]
pub async fn customer_content(state: Data<AppState>) -> impl Responder {
    let footer = match state.pg_db.send(FetchFooter).await {
        Ok(Ok(resp)) => resp,
        _ => None,
    };

    let menu = match get_published_menu(&state.redis_db) {
        Ok(snapshot_json) => serde_json::from_str::<serde_json::Value>(&snapshot_json).ok(),
        Err(_) => match state.pg_db.send(FetchDishes { only_available: true }).await {
            Ok(Ok(dishes)) => Some(json!({ "dishes": dishes })),
            _ => None,
        },
    };

    HttpResponse::Ok().json(json!({
        "success": true,
        "footer": footer,
        "menu": menu,
    }))
}

#[post("/initialize")]
pub async fn initialize_content(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    if let Err(resp) = require_manager(&staff) {
        return resp;
    }

    match state.pg_db.send(InitializeContent).await {
        Ok(Ok(report)) => {
            log_activity(
                &state,
                Some(&staff),
                "initialize_content",
                "content",
                None,
                json!({
                    "footer_created": report.footer_created,
                    "legal_pages_created": report.legal_pages_created,
                }),
            )
            .await;
            HttpResponse::Ok().json(json!({ "success": true, "report": report }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to initialize content: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}
