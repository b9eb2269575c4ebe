use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    web, HttpRequest, HttpResponse, Responder,
};
use log::warn;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::itinerary::ItineraryPatch;
use crate::models::preferences::FieldViolation;
use crate::services::itinerary_service::{
    CreateItineraryError, ItineraryService, UpdateItineraryError,
};

const NOT_FOUND: &str = "Itinerary not found";
const INVALID_INPUT: &str = "Invalid input data";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<u64>,
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

fn invalid_id() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "message": "Invalid itinerary ID" }))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "message": NOT_FOUND }))
}

fn invalid_input(errors: &[FieldViolation]) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "message": INVALID_INPUT,
        "errors": errors,
    }))
}

/*
    POST /api/itinerary/generate
*/
pub async fn generate(service: web::Data<ItineraryService>, input: web::Json<Value>) -> impl Responder {
    match service.create_from_request(&input).await {
        Ok(saved) => HttpResponse::Ok().json(saved),
        Err(CreateItineraryError::InvalidInput(err)) => {
            warn!("Rejected travel preferences: {:?}", err.violations);
            invalid_input(&err.violations)
        }
        Err(CreateItineraryError::Generation(err)) => {
            HttpResponse::InternalServerError().json(json!({ "message": err.to_string() }))
        }
    }
}

/*
    GET /api/itinerary
*/
pub async fn get_all(
    service: web::Data<ItineraryService>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    HttpResponse::Ok().json(service.list(query.user_id))
}

/*
    GET /api/itinerary/{id}
*/
pub async fn get_by_id(path: web::Path<String>, service: web::Data<ItineraryService>) -> impl Responder {
    let Some(id) = parse_id(&path) else {
        return invalid_id();
    };

    match service.get(id) {
        Some(itinerary) => HttpResponse::Ok().json(itinerary),
        None => not_found(),
    }
}

/*
    PATCH /api/itinerary/{id}
*/
pub async fn update(
    path: web::Path<String>,
    service: web::Data<ItineraryService>,
    input: web::Json<ItineraryPatch>,
) -> impl Responder {
    let Some(id) = parse_id(&path) else {
        return invalid_id();
    };

    match service.update(id, input.into_inner()) {
        Ok(itinerary) => HttpResponse::Ok().json(itinerary),
        Err(UpdateItineraryError::InvalidInput(violations)) => invalid_input(&violations),
        Err(UpdateItineraryError::NotFound) => not_found(),
    }
}

/*
    DELETE /api/itinerary/{id}
*/
pub async fn delete(path: web::Path<String>, service: web::Data<ItineraryService>) -> impl Responder {
    let Some(id) = parse_id(&path) else {
        return invalid_id();
    };

    if service.delete(id) {
        HttpResponse::Ok().json(json!({ "message": "Itinerary deleted successfully" }))
    } else {
        not_found()
    }
}

/// Malformed or mistyped JSON bodies get the same 400 shape as rejected
/// preferences instead of actix's plain-text error.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    warn!("Rejected request body: {}", err);
    let response = invalid_input(&[FieldViolation {
        path: Vec::new(),
        message: err.to_string(),
    }]);
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = invalid_input(&[FieldViolation {
        path: vec!["userId".to_string()],
        message: err.to_string(),
    }]);
    InternalError::from_response(err, response).into()
}
