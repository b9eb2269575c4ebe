use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::services::itinerary_service::ItineraryService;

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    services: HashMap<String, ServiceStatus>,
    environment: String,
    version: String,
}

#[derive(Serialize, Clone)]
struct ServiceStatus {
    status: String,
    details: Option<String>,
}

/*
    /health
*/
pub async fn health_check(
    config: web::Data<AppConfig>,
    itineraries: web::Data<ItineraryService>,
) -> impl Responder {
    let mut health = HealthStatus {
        status: "ok".to_string(),
        services: HashMap::new(),
        environment: config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let generation_result = check_generation(&config);
    health
        .services
        .insert("generation".to_string(), generation_result.clone());

    let store_result = ServiceStatus {
        status: "ok".to_string(),
        details: Some(format!(
            "In-memory store holding {} itinerary(ies)",
            itineraries.store().len()
        )),
    };
    health.services.insert("store".to_string(), store_result);

    // The server still answers without a credential, but every generation
    // call will fail.
    if generation_result.status != "ok" {
        health.status = "degraded".to_string();
    }

    HttpResponse::Ok().json(health)
}

fn check_generation(config: &AppConfig) -> ServiceStatus {
    match config.generation.masked_api_key() {
        Some(masked_key) => ServiceStatus {
            status: "ok".to_string(),
            details: Some(format!(
                "OpenAI API key configured ({}), model {}",
                masked_key, config.generation.model
            )),
        },
        None => ServiceStatus {
            status: "error".to_string(),
            details: Some("OPENAI_API_KEY not configured".to_string()),
        },
    }
}
