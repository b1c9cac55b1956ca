use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use diesel::result::Error as DieselError;
use serde::Deserialize;
use serde_json::json;

use crate::services::auth::{log_activity, require_manager, staff_from_request};
use crate::services::db_utils::AppState;
use crate::services::insertable::{DishChangeset, NewDish};
use crate::services::messages::{
    CreateDish, DeleteDish, FetchCategories, FetchDish, FetchDishes, UpdateDish,
};
use crate::services::redis_handling::{put_published_menu, PublishedMenu};

#[get("/dishes")]
pub async fn get_dishes(state: Data<AppState>) -> impl Responder {
    match state.pg_db.send(FetchDishes { only_available: false }).await {
        Ok(Ok(resp)) => HttpResponse::Ok().json(json!({ "dishes": resp })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch dishes: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch dishes: {err}")),
    }
}

#[get("/dish/{id}")]
pub async fn get_dish(state: Data<AppState>, path: Path<i64>) -> impl Responder {
    match state.pg_db.send(FetchDish(path.into_inner())).await {
        Ok(Ok(resp)) => HttpResponse::Ok().json(resp),
        Ok(Err(DieselError::NotFound)) => HttpResponse::NotFound().json("Dish with that id not found"),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch dish: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch dish: {err}")),
    }
}

#[get("/categories")]
pub async fn get_categories(state: Data<AppState>) -> impl Responder {
    match state.pg_db.send(FetchCategories).await {
        Ok(Ok(resp)) => HttpResponse::Ok().json(json!({ "categories": resp })),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to fetch categories: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to fetch categories: {err}")),
    }
}

#[derive(Deserialize)]
pub struct DishBody {
    pub name: Option<String>,
    pub short_desc: Option<String>,
    pub full_desc: Option<String>,
    pub price: Option<i32>,
    pub currency: Option<String>,
    pub category_id: Option<i64>,
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

#[post("/dish")]
pub async fn create_dish(
    req: HttpRequest,
    state: Data<AppState>,
    body: Json<DishBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let name = body.name.clone().unwrap_or_default();
    if name.is_empty() {
        return HttpResponse::BadRequest().json("Dish name is required");
    }
    let Some(price) = body.price.filter(|p| *p >= 0) else {
        return HttpResponse::BadRequest().json("Dish price is required");
    };

    let now = Utc::now();
    let new_dish = NewDish {
        name,
        short_desc: body.short_desc.clone(),
        full_desc: body.full_desc.clone(),
        price,
        currency: body.currency.clone().unwrap_or_else(|| "USD".to_owned()),
        category_id: body.category_id,
        image_url: body.image_url.clone(),
        available: body.available.unwrap_or(true),
        created_at: now,
        updated_at: now,
    };

    match state.pg_db.send(CreateDish(new_dish)).await {
        Ok(Ok(dish)) => {
            log_activity(
                &state,
                Some(&staff),
                "create_dish",
                "dish",
                Some(dish.id),
                json!({ "name": dish.name, "price": dish.price }),
            )
            .await;
            HttpResponse::Ok().json(json!({ "success": true, "dish": dish }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to create dish: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[put("/dish/{id}")]
pub async fn update_dish(
    req: HttpRequest,
    state: Data<AppState>,
    path: Path<i64>,
    body: Json<DishBody>,
) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let changes = DishChangeset {
        name: body.name.clone(),
        short_desc: body.short_desc.clone(),
        full_desc: body.full_desc.clone(),
        price: body.price,
        currency: body.currency.clone(),
        category_id: body.category_id,
        image_url: body.image_url.clone(),
        available: body.available,
        updated_at: None,
    };

    match state.pg_db.send(UpdateDish { id, changes }).await {
        Ok(Ok(dish)) => {
            log_activity(
                &state,
                Some(&staff),
                "update_dish",
                "dish",
                Some(dish.id),
                json!({ "name": dish.name }),
            )
            .await;
            HttpResponse::Ok().json(json!({ "success": true, "dish": dish }))
        }
        Ok(Err(DieselError::NotFound)) => HttpResponse::NotFound().json("Dish with that id not found"),
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to update dish: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[delete("/dish/{id}")]
pub async fn delete_dish(req: HttpRequest, state: Data<AppState>, path: Path<i64>) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
        Err(resp) => return resp,
    };
    if let Err(resp) = require_manager(&staff) {
        return resp;
    }

    let id = path.into_inner();
    match state.pg_db.send(DeleteDish(id)).await {
        Ok(Ok(0)) => HttpResponse::NotFound().json("Dish with that id not found"),
        Ok(Ok(_)) => {
            log_activity(&state, Some(&staff), "delete_dish", "dish", Some(id), json!({})).await;
            HttpResponse::Ok().json(json!({ "success": true }))
        }
        Ok(Err(err)) => HttpResponse::InternalServerError().json(format!("Failed to delete dish: {err}")),
        Err(err) => HttpResponse::InternalServerError().json(format!("Unable to perform action: {err}")),
    }
}

#[post("/publish")]
pub async fn publish_menu(req: HttpRequest, state: Data<AppState>) -> impl Responder {
    let staff = match staff_from_request(&req, &state).await {
        Ok(staff) => staff,
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

    let snapshot = PublishedMenu {
        published_at: Utc::now(),
        categories,
        dishes,
    };

    match put_published_menu(&state.redis_db, &snapshot) {
        Ok(key) => {
            log_activity(
                &state,
                Some(&staff),
                "publish_menu",
                "menu",
                None,
                json!({ "snapshot_key": key, "dishes": snapshot.dishes.len() }),
            )
            .await;
            HttpResponse::Ok().json(json!({
                "success": true,
                "message": format!("Menu published under the key {key}"),
            }))
        }
        Err(err) => HttpResponse::InternalServerError().json(err),
    }
}
