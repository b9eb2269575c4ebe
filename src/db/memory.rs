use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{SecondsFormat, Utc};
use log::debug;

use crate::models::itinerary::{ItineraryUpdate, NewItinerary, StoredItinerary};

struct StoreState {
    next_id: u64,
    // ids are handed out in increasing order, so key order is insertion order
    records: BTreeMap<u64, StoredItinerary>,
}

/// Process-lifetime itinerary storage. One lock covers both the map and the
/// id counter, so every operation is linearizable.
pub struct ItineraryStore {
    state: Mutex<StoreState>,
}

impl Default for ItineraryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ItineraryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // A panic while holding the lock cannot leave a half-written record:
        // every mutation is a single insert/remove.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn create(&self, itinerary: NewItinerary) -> StoredItinerary {
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id += 1;

        let prefs = itinerary.preferences;
        let record = StoredItinerary {
            id,
            user_id: itinerary.user_id,
            title: itinerary.title,
            destination: prefs.destination,
            duration: prefs.duration,
            travelers: prefs.travelers,
            budget: prefs.budget,
            traveler_type: prefs.traveler_type,
            travel_pace: prefs.travel_pace,
            sleep_pattern: prefs.sleep_pattern,
            experience_type: prefs.experience_type,
            travel_purpose: prefs.travel_purpose,
            special_requirements: prefs.special_requirements,
            generated_itinerary: itinerary.generated_itinerary,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        state.records.insert(id, record.clone());
        debug!("Stored itinerary {}", id);
        record
    }

    pub fn get(&self, id: u64) -> Option<StoredItinerary> {
        self.lock().records.get(&id).cloned()
    }

    pub fn list(&self, user_id: Option<u64>) -> Vec<StoredItinerary> {
        self.lock()
            .records
            .values()
            .filter(|record| user_id.is_none() || record.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn update(&self, id: u64, update: ItineraryUpdate) -> Option<StoredItinerary> {
        let mut state = self.lock();
        let record = state.records.get_mut(&id)?;
        update.apply(record);
        Some(record.clone())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.lock().records.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
