use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::memory::ItineraryStore;
use trip_planner_api::routes;
use trip_planner_api::services::generation::{GenerationService, OpenAiClient};
use trip_planner_api::services::itinerary_service::ItineraryService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    info!("Application starting...");

    let config = AppConfig::from_env();

    let client = OpenAiClient::new(&config.generation).map_err(|e| {
        error!("Failed to build OpenAI client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let generator = GenerationService::new(Arc::new(client), config.generation.temperature);

    // Constructed once here and shared by every worker.
    let store = Arc::new(ItineraryStore::new());
    let itineraries = web::Data::new(ItineraryService::new(store, generator));
    let app_config = web::Data::new(config.clone());

    info!(
        "Attempting to bind to {}:{} (model {})",
        config.host, config.port, config.generation.model
    );

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(app_config.clone())
            .app_data(itineraries.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
