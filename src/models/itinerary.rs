use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::preferences::{FieldViolation, TravelPreferences};
use crate::services::validation_service::{validate_shape, ShapeError};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "morning" => Some(TimeOfDay::Morning),
            "afternoon" => Some(TimeOfDay::Afternoon),
            "evening" => Some(TimeOfDay::Evening),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    pub time: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub transport: String,
    pub cost: String,
    pub tags: Vec<String>,
    pub time_of_day: TimeOfDay,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub estimated_budget: String,
    pub activities: Vec<DayActivity>,
}

/// Itinerary content as synthesized by the language model.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItinerary {
    pub title: String,
    pub destination: String,
    pub duration: String,
    pub travelers: u32,
    pub budget: String,
    pub experience_tags: Vec<String>,
    pub days: Vec<ItineraryDay>,
}

/// Everything the store needs to create a record; id and timestamp are
/// assigned by the store itself.
#[derive(Debug, Clone)]
pub struct NewItinerary {
    pub user_id: Option<u64>,
    pub title: String,
    pub preferences: TravelPreferences,
    pub generated_itinerary: GeneratedItinerary,
}

impl NewItinerary {
    pub fn from_generation(preferences: TravelPreferences, generated: GeneratedItinerary) -> Self {
        Self {
            user_id: None,
            title: generated.title.clone(),
            preferences,
            generated_itinerary: generated,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredItinerary {
    pub id: u64,
    pub user_id: Option<u64>,
    pub title: String,
    pub destination: String,
    pub duration: String,
    pub travelers: u32,
    pub budget: String,
    pub traveler_type: String,
    pub travel_pace: String,
    pub sleep_pattern: String,
    pub experience_type: String,
    pub travel_purpose: String,
    pub special_requirements: Option<String>,
    pub generated_itinerary: GeneratedItinerary,
    pub created_at: String,
}

/// PATCH body as sent by a client. `id` and `createdAt` are not
/// updatable and are dropped if a client sends them.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryPatch {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub user_id: Option<Option<u64>>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub travelers: Option<u32>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub traveler_type: Option<String>,
    #[serde(default)]
    pub travel_pace: Option<String>,
    #[serde(default)]
    pub sleep_pattern: Option<String>,
    #[serde(default)]
    pub experience_type: Option<String>,
    #[serde(default)]
    pub travel_purpose: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub special_requirements: Option<Option<String>>,
    /// Kept untyped until it has been through `validate_shape`.
    #[serde(default)]
    pub generated_itinerary: Option<Value>,
}

impl ItineraryPatch {
    /// Applies the same rules creation enforces: supplied text fields must
    /// be non-empty, travelers at least 1, and a replacement itinerary must
    /// pass the shape check. A blank `specialRequirements` clears the field.
    pub fn validate(self) -> Result<ItineraryUpdate, Vec<FieldViolation>> {
        let text_fields = [
            ("title", &self.title),
            ("destination", &self.destination),
            ("duration", &self.duration),
            ("budget", &self.budget),
            ("travelerType", &self.traveler_type),
            ("travelPace", &self.travel_pace),
            ("sleepPattern", &self.sleep_pattern),
            ("experienceType", &self.experience_type),
            ("travelPurpose", &self.travel_purpose),
        ];

        let mut violations: Vec<FieldViolation> = text_fields
            .into_iter()
            .filter(|(_, value)| matches!(value, Some(v) if v.trim().is_empty()))
            .map(|(field, _)| FieldViolation::new(field, "Must not be empty"))
            .collect();

        if self.travelers == Some(0) {
            violations.push(FieldViolation::new(
                "travelers",
                "At least 1 traveler is required",
            ));
        }

        let generated_itinerary = match self.generated_itinerary.as_ref().map(validate_shape) {
            Some(Ok(itinerary)) => Some(itinerary),
            Some(Err(err)) => {
                violations.push(shape_violation(&err));
                None
            }
            None => None,
        };

        if !violations.is_empty() {
            return Err(violations);
        }

        let special_requirements = self
            .special_requirements
            .map(|value| value.filter(|text| !text.trim().is_empty()));

        Ok(ItineraryUpdate {
            user_id: self.user_id,
            title: self.title,
            destination: self.destination,
            duration: self.duration,
            travelers: self.travelers,
            budget: self.budget,
            traveler_type: self.traveler_type,
            travel_pace: self.travel_pace,
            sleep_pattern: self.sleep_pattern,
            experience_type: self.experience_type,
            travel_purpose: self.travel_purpose,
            special_requirements,
            generated_itinerary,
        })
    }
}

// "$" is the itinerary root; deeper paths are nested under the field name.
fn shape_violation(err: &ShapeError) -> FieldViolation {
    let mut path = vec!["generatedItinerary".to_string()];
    if err.path != "$" {
        path.extend(err.path.split('.').map(str::to_string));
    }
    FieldViolation {
        path,
        message: format!("Expected {}", err.expected),
    }
}

/// Checked partial update, produced by [`ItineraryPatch::validate`].
/// `Some(None)` on a nullable field clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryUpdate {
    pub user_id: Option<Option<u64>>,
    pub title: Option<String>,
    pub destination: Option<String>,
    pub duration: Option<String>,
    pub travelers: Option<u32>,
    pub budget: Option<String>,
    pub traveler_type: Option<String>,
    pub travel_pace: Option<String>,
    pub sleep_pattern: Option<String>,
    pub experience_type: Option<String>,
    pub travel_purpose: Option<String>,
    pub special_requirements: Option<Option<String>>,
    pub generated_itinerary: Option<GeneratedItinerary>,
}

impl ItineraryUpdate {
    /// Shallow merge over an existing record.
    pub fn apply(self, record: &mut StoredItinerary) {
        if let Some(user_id) = self.user_id {
            record.user_id = user_id;
        }
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(destination) = self.destination {
            record.destination = destination;
        }
        if let Some(duration) = self.duration {
            record.duration = duration;
        }
        if let Some(travelers) = self.travelers {
            record.travelers = travelers;
        }
        if let Some(budget) = self.budget {
            record.budget = budget;
        }
        if let Some(traveler_type) = self.traveler_type {
            record.traveler_type = traveler_type;
        }
        if let Some(travel_pace) = self.travel_pace {
            record.travel_pace = travel_pace;
        }
        if let Some(sleep_pattern) = self.sleep_pattern {
            record.sleep_pattern = sleep_pattern;
        }
        if let Some(experience_type) = self.experience_type {
            record.experience_type = experience_type;
        }
        if let Some(travel_purpose) = self.travel_purpose {
            record.travel_purpose = travel_purpose;
        }
        if let Some(special_requirements) = self.special_requirements {
            record.special_requirements = special_requirements;
        }
        if let Some(generated_itinerary) = self.generated_itinerary {
            record.generated_itinerary = generated_itinerary;
        }
    }
}
