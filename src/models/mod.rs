pub mod itinerary;
pub mod preferences;
