use crate::models::preferences::TravelPreferences;

pub const SYSTEM_PROMPT: &str = "You are an expert travel planner. Create detailed, personalized \
itineraries based on user preferences. Always respond with valid JSON format.";

/// Output shape the model is asked to follow. Field names must stay in sync
/// with `GeneratedItinerary`.
pub const EXPECTED_SCHEMA: &str = r#"{
  "title": "Trip title",
  "destination": "Destination name",
  "duration": "Duration",
  "travelers": number,
  "budget": "Budget range",
  "experienceTags": ["tag1", "tag2", "tag3"],
  "days": [
    {
      "day": 1,
      "title": "Day title",
      "estimatedBudget": "Budget per person",
      "activities": [
        {
          "time": "9:00 AM - 12:00 PM",
          "title": "Activity title",
          "description": "Activity description",
          "duration": "3 hours",
          "transport": "Walking/Metro/etc",
          "cost": "€25-35",
          "tags": ["cultural", "historical"],
          "timeOfDay": "morning"
        }
      ]
    }
  ]
}"#;

const GUIDELINES: [&str; 6] = [
    "Each day should have morning, afternoon, and evening activities",
    "Include specific activity titles, descriptions, estimated duration, transport between locations, and estimated costs",
    "Tag each activity with relevant categories (cultural, romantic, adventurous, culinary, historical, nature, luxury, social)",
    "Provide realistic time estimates and budget breakdowns",
    "Consider the traveler's pace and sleep pattern preferences",
    "Include rest periods if needed based on pace preference",
];

/// Renders the user prompt for one trip request.
pub fn build_prompt(prefs: &TravelPreferences) -> String {
    let special_requirements = prefs.special_requirements.as_deref().unwrap_or("None");
    let travelers = prefs.travelers.to_string();

    let mut prompt = String::from("Create a detailed travel itinerary based on these preferences:\n\n");
    let details = [
        ("Destination", prefs.destination.as_str()),
        ("Duration", prefs.duration.as_str()),
        ("Number of travelers", travelers.as_str()),
        ("Budget", prefs.budget.as_str()),
        ("Traveler type", prefs.traveler_type.as_str()),
        ("Travel pace", prefs.travel_pace.as_str()),
        ("Sleep pattern", prefs.sleep_pattern.as_str()),
        ("Experience type", prefs.experience_type.as_str()),
        ("Travel purpose", prefs.travel_purpose.as_str()),
        ("Special requirements", special_requirements),
    ];
    for (label, value) in details {
        prompt.push_str(&format!("{}: {}\n", label, value));
    }

    prompt.push_str("\nPlease create a comprehensive day-by-day itinerary with the following structure:\n");
    for line in GUIDELINES {
        prompt.push_str(&format!("- {}\n", line));
    }

    prompt.push_str("\nReturn the response as JSON with this exact structure:\n");
    prompt.push_str(EXPECTED_SCHEMA);
    prompt
}
