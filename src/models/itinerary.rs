use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One day of an itinerary. Saved records keep whatever the caller sent, so
/// the ordinal and title may be absent and the ordinal need not be whole.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Day {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// A saved itinerary as it lives in the store.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub city: String,
    pub days: Vec<Day>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Itinerary {
    /// Stamps a fresh identifier and creation time onto a validated payload.
    pub fn create(new: NewItinerary) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: ObjectId::new(),
            city: new.city,
            days: new.days,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Payload accepted by the save endpoint once it has passed shape checks.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NewItinerary {
    pub city: String,
    pub days: Vec<Day>,
}

/// External representation: `_id` becomes `id`, timestamps are RFC 3339.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryView {
    pub id: String,
    pub city: String,
    pub days: Vec<Day>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Itinerary> for ItineraryView {
    fn from(itinerary: Itinerary) -> Self {
        Self {
            id: itinerary.id.to_hex(),
            city: itinerary.city,
            days: itinerary.days,
            created_at: itinerary.created_at.to_chrono(),
            updated_at: itinerary.updated_at.to_chrono(),
        }
    }
}

/// A generated itinerary that has passed schema verification.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ItineraryDraft {
    pub city: String,
    pub days: Vec<Day>,
}
