//! Structural validation of itinerary JSON returned by the language model.
//!
//! The reply is untrusted text, so it is walked field by field instead of being
//! handed straight to serde: the first bad field is reported with its full path
//! (`days[1].activities[0].timeOfDay`), which is what ends up in logs and in the
//! error message returned to the client.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::itinerary::{DayActivity, GeneratedItinerary, ItineraryDay, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Generated itinerary has an invalid `{path}` field: expected {expected}")]
pub struct ShapeError {
    pub path: String,
    pub expected: &'static str,
}

impl ShapeError {
    fn new(path: impl Into<String>, expected: &'static str) -> Self {
        Self {
            path: path.into(),
            expected,
        }
    }
}

const ACTIVITY_TEXT_FIELDS: [&str; 6] = ["time", "title", "description", "duration", "transport", "cost"];

pub fn validate_shape(candidate: &Value) -> Result<GeneratedItinerary, ShapeError> {
    let root = candidate
        .as_object()
        .ok_or_else(|| ShapeError::new("$", "an object"))?;

    let title = text(root, "title", "")?;
    let destination = text(root, "destination", "")?;
    let duration = text(root, "duration", "")?;
    let travelers = positive_integer(root, "travelers", "")?;
    let budget = text(root, "budget", "")?;
    let experience_tags = text_list(root, "experienceTags", "")?;

    let days = array(root, "days", "")?
        .iter()
        .enumerate()
        .map(|(index, day)| validate_day(day, &format!("days[{}]", index)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GeneratedItinerary {
        title,
        destination,
        duration,
        travelers,
        budget,
        experience_tags,
        days,
    })
}

fn validate_day(value: &Value, path: &str) -> Result<ItineraryDay, ShapeError> {
    let day = value
        .as_object()
        .ok_or_else(|| ShapeError::new(path, "an object"))?;

    let number = positive_integer(day, "day", path)?;
    let title = text(day, "title", path)?;
    let estimated_budget = text(day, "estimatedBudget", path)?;

    let activities = array(day, "activities", path)?
        .iter()
        .enumerate()
        .map(|(index, activity)| {
            validate_activity(activity, &format!("{}.activities[{}]", path, index))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ItineraryDay {
        day: number,
        title,
        estimated_budget,
        activities,
    })
}

fn validate_activity(value: &Value, path: &str) -> Result<DayActivity, ShapeError> {
    let activity = value
        .as_object()
        .ok_or_else(|| ShapeError::new(path, "an object"))?;

    let [time, title, description, duration, transport, cost] = {
        let mut fields: [String; 6] = Default::default();
        for (slot, key) in fields.iter_mut().zip(ACTIVITY_TEXT_FIELDS) {
            *slot = text(activity, key, path)?;
        }
        fields
    };
    let tags = text_list(activity, "tags", path)?;

    let time_of_day = activity
        .get("timeOfDay")
        .and_then(Value::as_str)
        .and_then(TimeOfDay::parse)
        .ok_or_else(|| {
            ShapeError::new(
                field_path(path, "timeOfDay"),
                "one of \"morning\", \"afternoon\", \"evening\"",
            )
        })?;

    Ok(DayActivity {
        time,
        title,
        description,
        duration,
        transport,
        cost,
        tags,
        time_of_day,
    })
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn text(object: &Map<String, Value>, key: &str, parent: &str) -> Result<String, ShapeError> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ShapeError::new(field_path(parent, key), "a string"))
}

fn positive_integer(object: &Map<String, Value>, key: &str, parent: &str) -> Result<u32, ShapeError> {
    object
        .get(key)
        .and_then(Value::as_u64)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ShapeError::new(field_path(parent, key), "a positive integer"))
}

fn array<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    parent: &str,
) -> Result<&'a Vec<Value>, ShapeError> {
    object
        .get(key)
        .and_then(Value::as_array)
        .ok_or_else(|| ShapeError::new(field_path(parent, key), "an array"))
}

fn text_list(object: &Map<String, Value>, key: &str, parent: &str) -> Result<Vec<String>, ShapeError> {
    let items = array(object, key, parent)?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                ShapeError::new(format!("{}[{}]", field_path(parent, key), index), "a string")
            })
        })
        .collect()
}
