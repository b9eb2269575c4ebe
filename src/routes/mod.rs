use actix_web::web;

pub mod health;
pub mod itinerary;

/// Registers every route; shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(itinerary::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(itinerary::query_error_handler))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api").service(
                web::scope("/itinerary")
                    .route("", web::get().to(itinerary::get_all))
                    .route("/generate", web::post().to(itinerary::generate))
                    .route("/{id}", web::get().to(itinerary::get_by_id))
                    .route("/{id}", web::patch().to(itinerary::update))
                    .route("/{id}", web::delete().to(itinerary::delete)),
            ),
        );
}
