use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::services::auth::{log_activity, staff_from_request};
use crate::services::content_route::LEGAL_PAGE_TYPES;
use crate::services::db_utils::AppState;
use crate::services::messages::{FetchCategories, FetchDishes, UpsertLegalPage};
use crate::types::PortalError;

fn api_key(state: &Data<AppState>) -> Result<&str, HttpResponse> {
    state.settings.customer_api_key.as_deref().ok_or_else(|| {
        HttpResponse::InternalServerError().json(PortalError::CustomerApiKeyMissing.to_string())
    })
}

/// Pulls a JSON document from the companion customer website.
async fn pull_from_customer(state: &Data<AppState>, path: &str) -> Result<Value, HttpResponse> {
    let key = api_key(state)?;
    let url = format!("{}{path}", state.settings.customer_website_url);

    let response = state
        .http
        .get(&url)
        .header("X-API-Key", key)
        .send()
        .await
        .map_err(|err| HttpResponse::BadGateway().json(format!("Customer website unreachable: {err}")))?;

    if !response.status().is_success() {
        return Err(HttpResponse::BadGateway()
            .json(format!("Customer website answered with status {}", response.status())));
    }

    response
        .json::<Value>()
        .await
        .map_err(|err| HttpResponse::BadGateway().json(format!("Customer website sent invalid JSON: {err}")))
}

#[get("/menu")]
pub async fn pull_menu(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    if let Err(resp) = staff_from_request(&req, &state).await.map(|_| ()) {
        return resp;
    }

    match pull_from_customer(&state, "/api/menu").await {
        Ok(data) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": data,
            "source": "customer_website",
            "fetched_at": Utc::now(),
        })),
        Err(resp) => resp,
    }
}

#[get("/legal")]
pub async fn pull_legal(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    if let Err(resp) = staff_from_request(&req, &state).await.map(|_| ()) {
        return resp;
    }

    match pull_from_customer(&state, "/api/legal").await {
        Ok(data) => HttpResponse::Ok().json(json!({
            "success": true,
            "data": data,
            "source": "customer_website",
            "fetched_at": Utc::now(),
        })),
        Err(resp) => resp,
    }
}

/// Pushes the current menu to the customer website so both sites serve the
/// same dishes.
#[post("/menu")]
pub async fn push_menu(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    let key = match api_key(&state) {
        Ok(key) => key.to_owned(),
        Err(resp) => return resp,
    };

    let dishes = match state.pg_db.send(FetchDishes { only_available: true }).await {
        Ok(Ok(resp)) => resp,
        Ok(Err(err)) => {
            return HttpResponse::InternalServerError().json(format!("Failed to fetch dishes: {err}"))
        }
        Err(err) => {
            return HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}"))
        }
    };
    let categories = match state.pg_db.send(FetchCategories).await {
        Ok(Ok(resp)) => resp,
        _ => return HttpResponse::InternalServerError().json("Unable to fetch categories"),
    };

    let url = format!("{}/api/menu/sync", state.settings.customer_website_url);
    let payload = json!({
        "categories": categories,
        "dishes": dishes,
        "pushed_at": Utc::now(),
    });

    let response = match state
        .http
        .post(&url)
        .header("X-API-Key", key)
        .json(&payload)
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            return HttpResponse::BadGateway().json(format!("Customer website unreachable: {err}"))
        }
    };
    if !response.status().is_success() {
        return HttpResponse::BadGateway()
            .json(format!("Customer website answered with status {}", response.status()));
    }

    info!("pushed {} dishes to the customer website", dishes.len());
    log_activity(
        &state,
        Some(&staff),
        "push_menu_to_customer",
        "menu",
        None,
        json!({ "dishes": dishes.len(), "categories": categories.len() }),
    )
    .await;

    HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Pushed {} dishes to the customer website", dishes.len()),
    }))
}

#[derive(Deserialize)]
pub struct ImportLegalBody {
    #[serde(rename = "type")]
    pub page_type: String,
}

/// Imports one legal page from the customer website and stores it locally.
#[post("/legal/import")]
pub async fn import_legal(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<ImportLegalBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    if !LEGAL_PAGE_TYPES.contains(&body.page_type.as_str()) {
        return HttpResponse::BadRequest()
            .json("type must be one of privacy, terms, accessibility");
    }

    let data = match pull_from_customer(&state, &format!("/api/legal?type={}", body.page_type)).await
    {
        Ok(data) => data,
        Err(resp) => return resp,
    };

    let Some(page) = data
        .get("legalPages")
        .and_then(Value::as_array)
        .and_then(|pages| pages.first())
    else {
        return HttpResponse::NotFound()
            .json(format!("Customer website has no {} page", body.page_type));
    };

    let title = page
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(&body.page_type)
        .to_owned();
    let sections = page.get("sections").cloned().unwrap_or_else(|| json!([]));
    if !sections.is_array() {
        return HttpResponse::BadGateway().json("Customer website sent a page without sections");
    }

    let msg = UpsertLegalPage {
        page_type: body.page_type.clone(),
        title,
        sections,
    };
    match state.pg_db.send(msg).await {
        Ok(Ok(stored)) => {
            log_activity(
                &state,
                Some(&staff),
                "import_legal_page",
                "legal_page",
                Some(stored.id),
                json!({ "type": stored.page_type, "source": "customer_website" }),
            )
            .await;
            HttpResponse::Ok().json(json!({ "success": true, "legal_page": stored }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to save legal page: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}
