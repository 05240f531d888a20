//! Shape checks run on request bodies before any external call is made.

use serde_json::Value;

use crate::{
    error::ApiError,
    models::itinerary::{Day, NewItinerary},
};

const INVALID_PREVIEW_INPUT: &str =
    "Invalid input. 'city' must be a string and 'days' must be a positive integer.";
const INVALID_ITINERARY_DATA: &str = "Invalid itinerary data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInput {
    pub city: String,
    pub days: u32,
}

pub fn validate_preview_input(body: &Value) -> Result<PreviewInput, ApiError> {
    let invalid = || ApiError::Validation(INVALID_PREVIEW_INPUT.to_string());

    let city = non_empty_city(body).ok_or_else(invalid)?;
    let days = body
        .get("days")
        .and_then(positive_integer)
        .ok_or_else(invalid)?;

    Ok(PreviewInput { city, days })
}

pub fn validate_save_input(body: &Value) -> Result<NewItinerary, ApiError> {
    let invalid = || ApiError::Validation(INVALID_ITINERARY_DATA.to_string());

    let city = non_empty_city(body).ok_or_else(invalid)?;
    let days = match body.get("days") {
        Some(days @ Value::Array(_)) => {
            serde_json::from_value::<Vec<Day>>(days.clone()).map_err(|_| invalid())?
        }
        _ => return Err(invalid()),
    };

    Ok(NewItinerary { city, days })
}

fn non_empty_city(body: &Value) -> Option<String> {
    match body.get("city") {
        Some(Value::String(city)) if !city.trim().is_empty() => Some(city.clone()),
        _ => None,
    }
}

// Whole-valued floats such as `3.0` count as integers.
fn positive_integer(value: &Value) -> Option<u32> {
    if let Some(whole) = value.as_u64() {
        return u32::try_from(whole).ok().filter(|days| *days > 0);
    }

    let f = value.as_f64()?;
    if f.fract() != 0.0 || f < 1.0 || f > u32::MAX as f64 {
        return None;
    }
    Some(f as u32)
}
