#![allow(dead_code)]

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trip_planner_api::config::AppConfig;
use trip_planner_api::db::memory::ItineraryStore;
use trip_planner_api::routes;
use trip_planner_api::services::generation::{
    CompletionClient, CompletionRequest, GenerationError, GenerationService,
};
use trip_planner_api::services::itinerary_service::ItineraryService;

/// What the fake language model answers with.
pub enum Script {
    Reply(String),
    Fail(fn() -> GenerationError),
}

pub struct ScriptedClient {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Reply(reply) => Ok(reply.clone()),
            Script::Fail(make) => Err(make()),
        }
    }
}

pub struct TestApp {
    pub client: Arc<ScriptedClient>,
    pub config: AppConfig,
    pub itineraries: web::Data<ItineraryService>,
}

impl TestApp {
    pub fn new(script: Script) -> Self {
        Self::with_config(script, AppConfig::from_lookup(|_| None))
    }

    pub fn with_config(script: Script, config: AppConfig) -> Self {
        let client = Arc::new(ScriptedClient {
            script,
            calls: AtomicUsize::new(0),
        });
        let generator = GenerationService::new(client.clone(), config.generation.temperature);
        let itineraries = web::Data::new(ItineraryService::new(
            Arc::new(ItineraryStore::new()),
            generator,
        ));

        Self {
            client,
            config,
            itineraries,
        }
    }

    pub fn replying() -> Self {
        Self::new(Script::Reply(get_test_reply().to_string()))
    }

    pub fn create_app(&self) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(self.config.clone()))
            .app_data(self.itineraries.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::configure)
    }
}

pub fn get_test_preferences() -> Value {
    json!({
        "destination": "Paris, France",
        "duration": "3-5 days",
        "travelers": 2,
        "budget": "Moderate ($50-$150/day)",
        "travelerType": "couples",
        "travelPace": "relaxed",
        "sleepPattern": "early-bird",
        "experienceType": "romantic",
        "travelPurpose": "leisure"
    })
}

pub fn get_test_reply() -> Value {
    json!({
        "title": "Romantic Paris Getaway",
        "destination": "Paris, France",
        "duration": "3-5 days",
        "travelers": 2,
        "budget": "Moderate ($50-$150/day)",
        "experienceTags": ["romantic", "cultural", "culinary"],
        "days": [
            {
                "day": 1,
                "title": "Montmartre and the Seine",
                "estimatedBudget": "€110 per person",
                "activities": [
                    {
                        "time": "9:00 AM - 11:30 AM",
                        "title": "Sacré-Cœur and Montmartre",
                        "description": "Climb the hill and wander the artists' square.",
                        "duration": "2.5 hours",
                        "transport": "Metro",
                        "cost": "Free",
                        "tags": ["cultural", "historical"],
                        "timeOfDay": "morning"
                    },
                    {
                        "time": "2:00 PM - 5:00 PM",
                        "title": "Louvre highlights",
                        "description": "Timed entry covering the main wings.",
                        "duration": "3 hours",
                        "transport": "Metro",
                        "cost": "€22",
                        "tags": ["cultural"],
                        "timeOfDay": "afternoon"
                    },
                    {
                        "time": "8:00 PM - 10:00 PM",
                        "title": "Seine dinner cruise",
                        "description": "Dinner on the river as the city lights up.",
                        "duration": "2 hours",
                        "transport": "Walking",
                        "cost": "€85",
                        "tags": ["romantic", "culinary"],
                        "timeOfDay": "evening"
                    }
                ]
            }
        ]
    })
}
