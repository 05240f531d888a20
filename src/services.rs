pub mod generation_service;
pub mod geocoding_service;
pub mod itinerary_schema;
pub mod itinerary_service;
