pub mod generation;
pub mod itinerary_service;
pub mod prompt_service;
pub mod validation_service;
