//! Output contract for generated itineraries.
//!
//! The same [`ItinerarySchema`] value renders the JSON schema sent to the
//! generation provider and verifies what comes back, so the two cannot drift.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::itinerary::{Day, ItineraryDraft};

pub const SCHEMA_NAME: &str = "travel_itinerary";
pub const MIN_ACTIVITIES_PER_DAY: usize = 2;

#[derive(Debug, Error)]
pub enum SchemaViolation {
    #[error("document does not match the itinerary shape: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("expected {expected} days, got {actual}")]
    DayCount { expected: u32, actual: usize },
    #[error("day ordinal must be at least 1 (entry {index})")]
    DayOrdinal { index: usize },
    #[error("day {day} lists {actual} activities, at least {min} required", min = MIN_ACTIVITIES_PER_DAY)]
    TooFewActivities { day: u32, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItinerarySchema {
    pub day_count: u32,
}

// Strict mirrors of the schema: unknown properties are rejected at both levels.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictItinerary {
    city: String,
    days: Vec<StrictDay>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StrictDay {
    day: u32,
    title: String,
    activities: Vec<String>,
}

impl ItinerarySchema {
    pub fn new(day_count: u32) -> Self {
        Self { day_count }
    }

    pub fn to_json_schema(&self) -> Value {
        json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "city": { "type": "string" },
                "days": {
                    "type": "array",
                    "minItems": self.day_count,
                    "maxItems": self.day_count,
                    "items": {
                        "type": "object",
                        "additionalProperties": false,
                        "properties": {
                            "day": { "type": "integer", "minimum": 1 },
                            "title": { "type": "string" },
                            "activities": {
                                "type": "array",
                                "minItems": MIN_ACTIVITIES_PER_DAY,
                                "items": { "type": "string" }
                            }
                        },
                        "required": ["day", "title", "activities"]
                    }
                }
            },
            "required": ["city", "days"]
        })
    }

    pub fn verify(&self, document: &Value) -> Result<ItineraryDraft, SchemaViolation> {
        let parsed = StrictItinerary::deserialize(document)?;

        if parsed.days.len() != self.day_count as usize {
            return Err(SchemaViolation::DayCount {
                expected: self.day_count,
                actual: parsed.days.len(),
            });
        }

        let mut days = Vec::with_capacity(parsed.days.len());
        for (index, day) in parsed.days.into_iter().enumerate() {
            if day.day < 1 {
                return Err(SchemaViolation::DayOrdinal { index });
            }
            if day.activities.len() < MIN_ACTIVITIES_PER_DAY {
                return Err(SchemaViolation::TooFewActivities {
                    day: day.day,
                    actual: day.activities.len(),
                });
            }
            days.push(Day {
                day: Some(day.day.into()),
                title: Some(day.title),
                activities: day.activities,
            });
        }

        Ok(ItineraryDraft {
            city: parsed.city,
            days,
        })
    }
}
