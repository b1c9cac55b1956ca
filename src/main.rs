use actix::SyncArbiter;
use actix_cors::Cors;
use actix_web::web::Data;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use services::db_utils::{get_db_pool, AppState, PgActor};
use settings::Settings;

mod schema;
mod services;
mod settings;
mod types;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::load().expect("configuration must be valid");

    let pool = get_db_pool(&settings.pg_database_url).expect("postgres pool must initialize");
    let pg_db = SyncArbiter::start(5, move || PgActor(pool.clone()));
    let redis_db =
        redis::Client::open(settings.redis_database_uri.clone()).expect("redis uri must be valid");
    let http = reqwest::Client::new();

    let bind_addr = settings.bind_addr.clone();
    info!("starting staff portal backend on {bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(Data::new(AppState {
                pg_db: pg_db.clone(),
                redis_db: redis_db.clone(),
                http: http.clone(),
                settings: settings.clone(),
            }))
            .service(services::home_page)
            .service(
                web::scope("/reservations")
                    .service(services::reservations_route::fetch_reservations)
                    .service(services::reservations_route::add_reservation)
                    .service(services::reservations_route::confirm_reservation)
                    .service(services::reservations_route::mark_arrived)
                    .service(services::reservations_route::mark_completed)
                    .service(services::reservations_route::cancel_reservation),
            )
            .service(
                web::scope("/menu")
                    .service(services::menu_route::get_dishes)
                    .service(services::menu_route::get_dish)
                    .service(services::menu_route::get_categories)
                    .service(services::menu_route::create_dish)
                    .service(services::menu_route::update_dish)
                    .service(services::menu_route::delete_dish)
                    .service(services::menu_route::publish_menu),
            )
            .service(
                web::scope("/loyalty")
                    .service(services::loyalty_route::award_points)
                    .service(services::loyalty_route::fetch_account)
                    .service(services::loyalty_route::adjust_points),
            )
            .service(
                web::scope("/content")
                    .service(services::content_route::fetch_legal_pages)
                    .service(services::content_route::upsert_legal_page)
                    .service(services::content_route::fetch_footer)
                    .service(services::content_route::upsert_footer)
                    .service(services::content_route::customer_content)
                    .service(services::content_route::initialize_content),
            )
            .service(
                web::scope("/notifications")
                    .service(services::notifications_route::fetch_unread)
                    .service(services::notifications_route::mark_read),
            )
            .service(
                web::scope("/webhooks")
                    .service(services::webhook_route::ingest_reservation)
                    .service(services::webhook_route::ingest_order),
            )
            .service(
                web::scope("/analytics")
                    .service(services::analytics_route::record_batch)
                    .service(services::analytics_route::fetch_metrics)
                    .service(services::analytics_route::fetch_dashboard),
            )
            .service(
                web::scope("/sync")
                    .service(services::sync_route::pull_menu)
                    .service(services::sync_route::pull_legal)
                    .service(services::sync_route::push_menu)
                    .service(services::sync_route::import_legal),
            )
            .service(web::scope("/upload").service(services::upload_route::upload_image))
            .service(web::scope("/test").service(services::test_route::healthcheck))
    })
    .bind(bind_addr)?
    .run()
    .await
}
