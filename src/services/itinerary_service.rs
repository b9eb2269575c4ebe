use std::sync::Arc;

use log::{error, info};
use serde_json::Value;
use thiserror::Error;

use crate::db::memory::ItineraryStore;
use crate::models::itinerary::{ItineraryPatch, NewItinerary, StoredItinerary};
use crate::models::preferences::{FieldViolation, PreferenceError, TravelPreferences};
use crate::services::generation::{GenerationError, GenerationService};

#[derive(Debug, Error)]
pub enum CreateItineraryError {
    #[error(transparent)]
    InvalidInput(#[from] PreferenceError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Error)]
pub enum UpdateItineraryError {
    #[error("Invalid input data")]
    InvalidInput(Vec<FieldViolation>),
    #[error("Itinerary not found")]
    NotFound,
}

/// Ties generation to storage for the HTTP handlers.
#[derive(Clone)]
pub struct ItineraryService {
    store: Arc<ItineraryStore>,
    generator: GenerationService,
}

impl ItineraryService {
    pub fn new(store: Arc<ItineraryStore>, generator: GenerationService) -> Self {
        Self { store, generator }
    }

    pub fn store(&self) -> &ItineraryStore {
        &self.store
    }

    /// Validates the raw request body, generates an itinerary and stores it.
    /// Nothing is persisted unless generation succeeds.
    pub async fn create_from_request(&self, body: &Value) -> Result<StoredItinerary, CreateItineraryError> {
        let preferences = TravelPreferences::from_json(body)?;

        let generated = self.generator.generate(&preferences).await.map_err(|e| {
            error!("Failed to generate itinerary for {}: {}", preferences.destination, e);
            e
        })?;

        let saved = self
            .store
            .create(NewItinerary::from_generation(preferences, generated));
        info!("Saved itinerary {} ({})", saved.id, saved.title);
        Ok(saved)
    }

    pub fn get(&self, id: u64) -> Option<StoredItinerary> {
        self.store.get(id)
    }

    pub fn list(&self, user_id: Option<u64>) -> Vec<StoredItinerary> {
        self.store.list(user_id)
    }

    pub fn update(&self, id: u64, patch: ItineraryPatch) -> Result<StoredItinerary, UpdateItineraryError> {
        let update = patch.validate().map_err(UpdateItineraryError::InvalidInput)?;
        self.store
            .update(id, update)
            .ok_or(UpdateItineraryError::NotFound)
    }

    pub fn delete(&self, id: u64) -> bool {
        let deleted = self.store.delete(id);
        if deleted {
            info!("Deleted itinerary {}", id);
        }
        deleted
    }
}
