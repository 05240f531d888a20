//! City existence checks against a Nominatim-compatible geocoder.

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const LOCALITY_TYPES: [&str; 3] = ["city", "town", "village"];

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid geocoding endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// What to report when the geocoder cannot be reached or answers garbage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CityCheckPolicy {
    /// Treat the city as unknown, blocking generation during an outage.
    #[default]
    FailClosed,
    /// Let the city through unverified.
    FailOpen,
}

impl FromStr for CityCheckPolicy {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fail_closed" | "closed" => Ok(CityCheckPolicy::FailClosed),
            "fail_open" | "open" => Ok(CityCheckPolicy::FailOpen),
            other => Err(format!("unsupported city check policy: {}", other)),
        }
    }
}

#[async_trait]
pub trait CityLookup: Send + Sync {
    /// Whether the best match for `city` is classified as a locality.
    async fn lookup(&self, city: &str) -> Result<bool, GeocodingError>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    addresstype: Option<String>,
}

/// Only the best match counts; an empty result means no such place.
fn top_result_is_locality(places: &[NominatimPlace]) -> bool {
    places.first().is_some_and(NominatimPlace::is_locality)
}

impl NominatimPlace {
    fn is_locality(&self) -> bool {
        [&self.kind, &self.addresstype]
            .into_iter()
            .flatten()
            .any(|label| LOCALITY_TYPES.contains(&label.as_str()))
    }
}

#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    search_url: Url,
}

impl NominatimGeocoder {
    pub fn new(
        base_url: &Url,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, GeocodingError> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            search_url: base_url.join("search")?,
        })
    }
}

#[async_trait]
impl CityLookup for NominatimGeocoder {
    async fn lookup(&self, city: &str) -> Result<bool, GeocodingError> {
        let places: Vec<NominatimPlace> = self
            .client
            .get(self.search_url.clone())
            .query(&[
                ("q", city),
                ("format", "json"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(top_result_is_locality(&places))
    }
}

/// Runs the lookup and resolves failures according to `policy`.
pub async fn city_exists(lookup: &dyn CityLookup, city: &str, policy: CityCheckPolicy) -> bool {
    if city.trim().is_empty() {
        return false;
    }

    match lookup.lookup(city).await {
        Ok(found) => found,
        Err(err) => {
            let assume = policy == CityCheckPolicy::FailOpen;
            log::error!(
                "Geocoding check for {:?} failed, treating city as {}: {}",
                city,
                if assume { "existing" } else { "missing" },
                err
            );
            assume
        }
    }
}
