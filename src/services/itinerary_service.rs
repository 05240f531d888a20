use serde_json::Value;

use crate::{
    error::ApiError,
    services::{geocoding_service::city_exists, itinerary_schema::ItinerarySchema},
    state::AppState,
    validation::PreviewInput,
};

const GENERATION_FAILED: &str = "Failed to generate itinerary";

/// Verifies the city, asks the generator for an itinerary and, unless
/// disabled, checks the result against the schema it was generated under.
pub async fn preview_itinerary(state: &AppState, input: &PreviewInput) -> Result<Value, ApiError> {
    let settings = state.preview;

    if !city_exists(
        state.geocoder.as_ref(),
        &input.city,
        settings.city_check_policy,
    )
    .await
    {
        log::info!("Rejected preview for unknown city {:?}", input.city);
        return Err(ApiError::CityNotFound(input.city.clone()));
    }

    let schema = ItinerarySchema::new(input.days);
    let document = state
        .generator
        .generate(&input.city, &schema)
        .await
        .map_err(|err| {
            log::error!(
                "Itinerary generation failed for {:?} ({} days): {}",
                input.city,
                input.days,
                err
            );
            ApiError::Upstream(GENERATION_FAILED)
        })?;

    if !settings.verify_generated {
        return Ok(document);
    }

    let draft = schema.verify(&document).map_err(|err| {
        log::error!(
            "Generated itinerary for {:?} violates its schema: {}",
            input.city,
            err
        );
        ApiError::Upstream(GENERATION_FAILED)
    })?;

    serde_json::to_value(draft).map_err(|err| {
        log::error!("Failed to serialize generated itinerary: {}", err);
        ApiError::Upstream(GENERATION_FAILED)
    })
}
