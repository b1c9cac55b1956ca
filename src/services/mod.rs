use actix_web::{get, HttpResponse, Responder};

pub mod analytics_route;
pub mod auth;
pub mod content_route;
pub mod db_models;
pub mod db_utils;
pub mod insertable;
pub mod loyalty_route;
pub mod menu_route;
pub mod messages;
pub mod notifications_route;
pub mod pg_handling;
pub mod redis_handling;
pub mod reservations_route;
pub mod signature;
pub mod sync_route;
pub mod upload_route;
pub mod webhook_route;

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("Staff portal backend")
}

// sub-route "/test"
pub mod test_route {
    use actix_web::{get, HttpResponse, Responder};

    #[get("/healthcheck")]
    pub async fn healthcheck() -> impl Responder {
        HttpResponse::Ok().body("I'm alive!")
    }
}
