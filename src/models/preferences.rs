use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single rejected input field, reported back to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid input data ({} violation(s))", .violations.len())]
pub struct PreferenceError {
    pub violations: Vec<FieldViolation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPreferences {
    pub destination: String,
    pub duration: String,
    pub travelers: u32,
    pub budget: String,
    pub traveler_type: String,
    pub travel_pace: String,
    pub sleep_pattern: String,
    pub experience_type: String,
    pub travel_purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requirements: Option<String>,
}

// (json key, message when missing or empty)
const REQUIRED_TEXT_FIELDS: [(&str, &str); 8] = [
    ("destination", "Destination is required"),
    ("duration", "Duration is required"),
    ("budget", "Budget range is required"),
    ("travelerType", "Traveler type is required"),
    ("travelPace", "Travel pace is required"),
    ("sleepPattern", "Sleep pattern is required"),
    ("experienceType", "Experience type is required"),
    ("travelPurpose", "Travel purpose is required"),
];

const TRAVELERS_REQUIRED: &str = "At least 1 traveler is required";

impl TravelPreferences {
    /// Parses a request body, collecting every violation instead of stopping
    /// at the first one so the form can highlight all bad fields at once.
    pub fn from_json(body: &Value) -> Result<Self, PreferenceError> {
        let Some(object) = body.as_object() else {
            return Err(PreferenceError {
                violations: vec![FieldViolation {
                    path: Vec::new(),
                    message: "Expected a JSON object".to_string(),
                }],
            });
        };

        let mut violations = Vec::new();
        let mut text = |key: &str, message: &str| -> String {
            match object.get(key) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::String(_)) | None | Some(Value::Null) => {
                    violations.push(FieldViolation::new(key, message));
                    String::new()
                }
                Some(_) => {
                    violations.push(FieldViolation::new(key, "Expected a string"));
                    String::new()
                }
            }
        };

        let [destination, duration, budget, traveler_type, travel_pace, sleep_pattern, experience_type, travel_purpose] =
            REQUIRED_TEXT_FIELDS.map(|(key, message)| text(key, message));

        let travelers = parse_travelers(object, &mut violations);
        let special_requirements = parse_optional_text(object, "specialRequirements", &mut violations);

        if !violations.is_empty() {
            return Err(PreferenceError { violations });
        }

        Ok(Self {
            destination,
            duration,
            travelers,
            budget,
            traveler_type,
            travel_pace,
            sleep_pattern,
            experience_type,
            travel_purpose,
            special_requirements,
        })
    }
}

fn parse_travelers(object: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> u32 {
    match object.get("travelers") {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(count) if count >= 1 => match u32::try_from(count) {
                Ok(count) => count,
                Err(_) => {
                    violations.push(FieldViolation::new("travelers", "Too many travelers"));
                    0
                }
            },
            Some(_) => {
                violations.push(FieldViolation::new("travelers", TRAVELERS_REQUIRED));
                0
            }
            // negative or fractional
            None => {
                let message = if n.as_f64().is_some_and(|f| f < 1.0) {
                    TRAVELERS_REQUIRED
                } else {
                    "Expected a whole number of travelers"
                };
                violations.push(FieldViolation::new("travelers", message));
                0
            }
        },
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new("travelers", TRAVELERS_REQUIRED));
            0
        }
        Some(_) => {
            violations.push(FieldViolation::new("travelers", "Expected a number"));
            0
        }
    }
}

fn parse_optional_text(
    object: &Map<String, Value>,
    key: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match object.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(_) => {
            violations.push(FieldViolation::new(key, "Expected a string"));
            None
        }
    }
}
