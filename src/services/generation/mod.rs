//! Itinerary generation through a hosted language model.
//!
//! `CompletionClient` is the seam to the external service; `GenerationService`
//! owns the pipeline around it: prompt, call, JSON parse, shape validation.

use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};

use crate::models::itinerary::GeneratedItinerary;
use crate::models::preferences::TravelPreferences;
use crate::services::prompt_service::{build_prompt, SYSTEM_PROMPT};
use crate::services::validation_service::validate_shape;

pub mod error;
pub mod openai;

pub use error::GenerationError;
pub use openai::OpenAiClient;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub prompt: String,
    pub temperature: f32,
}

/// A text-generation backend asked for a single JSON-object reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct GenerationService {
    client: Arc<dyn CompletionClient>,
    temperature: f32,
}

impl GenerationService {
    pub fn new(client: Arc<dyn CompletionClient>, temperature: f32) -> Self {
        Self {
            client,
            temperature,
        }
    }

    pub async fn generate(
        &self,
        prefs: &TravelPreferences,
    ) -> Result<GeneratedItinerary, GenerationError> {
        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            prompt: build_prompt(prefs),
            temperature: self.temperature,
        };

        info!("Generating itinerary for {} ({})", prefs.destination, prefs.duration);

        let reply = self.client.complete(request).await.map_err(|e| {
            warn!("Itinerary generation failed [{}]: {}", e.kind(), e);
            e
        })?;

        let candidate: serde_json::Value = serde_json::from_str(&reply).map_err(|e| {
            warn!("Model reply is not JSON: {}", e);
            GenerationError::MalformedReply(e.to_string())
        })?;

        let itinerary = validate_shape(&candidate).map_err(|e| {
            warn!("Model reply failed shape validation: {}", e);
            GenerationError::from(e)
        })?;

        info!(
            "Generated \"{}\" with {} day(s)",
            itinerary.title,
            itinerary.days.len()
        );
        Ok(itinerary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedClient {
        reply: Result<String, fn() -> GenerationError>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedClient {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: fn() -> GenerationError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn prefs() -> TravelPreferences {
        TravelPreferences {
            destination: "Kyoto, Japan".to_string(),
            duration: "1 day".to_string(),
            travelers: 1,
            budget: "Budget".to_string(),
            traveler_type: "solo".to_string(),
            travel_pace: "fast-paced".to_string(),
            sleep_pattern: "early-bird".to_string(),
            experience_type: "offbeat".to_string(),
            travel_purpose: "wellness".to_string(),
            special_requirements: None,
        }
    }

    fn valid_reply() -> String {
        json!({
            "title": "Kyoto in a Day",
            "destination": "Kyoto, Japan",
            "duration": "1 day",
            "travelers": 1,
            "budget": "Budget",
            "experienceTags": ["cultural"],
            "days": [{
                "day": 1,
                "title": "Temples",
                "estimatedBudget": "¥5000",
                "activities": [{
                    "time": "6:00 AM - 8:00 AM",
                    "title": "Fushimi Inari hike",
                    "description": "Walk the torii gates before the crowds.",
                    "duration": "2 hours",
                    "transport": "Train",
                    "cost": "Free",
                    "tags": ["nature"],
                    "timeOfDay": "morning"
                }]
            }]
        })
        .to_string()
    }

    #[actix_rt::test]
    async fn test_generate_returns_validated_itinerary() {
        let client = CannedClient::replying(&valid_reply());
        let service = GenerationService::new(client.clone(), 0.7);

        let itinerary = service.generate(&prefs()).await.unwrap();
        assert_eq!(itinerary.title, "Kyoto in a Day");

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, 0.7);
        assert_eq!(seen[0].system_prompt, SYSTEM_PROMPT);
        assert!(seen[0].prompt.contains("Kyoto, Japan"));
    }

    #[actix_rt::test]
    async fn test_non_json_reply_is_malformed() {
        let service = GenerationService::new(CannedClient::replying("Sure! Here is your trip:"), 0.7);
        let err = service.generate(&prefs()).await.unwrap_err();
        assert!(matches!(err, GenerationError::MalformedReply(_)));
    }

    #[actix_rt::test]
    async fn test_reply_without_days_is_rejected() {
        let mut reply: serde_json::Value = serde_json::from_str(&valid_reply()).unwrap();
        reply.as_object_mut().unwrap().remove("days");
        let service = GenerationService::new(CannedClient::replying(&reply.to_string()), 0.7);

        match service.generate(&prefs()).await.unwrap_err() {
            GenerationError::InvalidShape(shape) => assert_eq!(shape.path, "days"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_upstream_errors_pass_through() {
        let service = GenerationService::new(CannedClient::failing(|| GenerationError::QuotaExceeded), 0.7);
        assert!(matches!(
            service.generate(&prefs()).await,
            Err(GenerationError::QuotaExceeded)
        ));

        let service = GenerationService::new(CannedClient::failing(|| GenerationError::RateLimited), 0.7);
        assert!(matches!(
            service.generate(&prefs()).await,
            Err(GenerationError::RateLimited)
        ));
    }
}
