use std::sync::Arc;

use thiserror::Error;

use crate::{
    config::{AppConfig, ConfigError, StoreBackend},
    db::{
        itinerary_store::{ItineraryStore, MemoryItineraryStore},
        mongo::{create_mongo_client, MongoItineraryStore},
    },
    services::{
        generation_service::{GenerationError, ItineraryGenerator, OpenAiGenerator},
        geocoding_service::{CityCheckPolicy, CityLookup, GeocodingError, NominatimGeocoder},
    },
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to connect to MongoDB: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("failed to build geocoding client: {0}")]
    Geocoding(#[from] GeocodingError),
    #[error("failed to build generation client: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSettings {
    pub city_check_policy: CityCheckPolicy,
    /// Re-check generated output against the schema before returning it.
    pub verify_generated: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            city_check_policy: CityCheckPolicy::FailClosed,
            verify_generated: true,
        }
    }
}

/// Collaborators built once at startup and shared read-only by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItineraryStore>,
    pub geocoder: Arc<dyn CityLookup>,
    pub generator: Arc<dyn ItineraryGenerator>,
    pub preview: PreviewSettings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ItineraryStore>,
        geocoder: Arc<dyn CityLookup>,
        generator: Arc<dyn ItineraryGenerator>,
        preview: PreviewSettings,
    ) -> Self {
        Self {
            store,
            geocoder,
            generator,
            preview,
        }
    }

    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store: Arc<dyn ItineraryStore> = match config.store_backend {
            StoreBackend::Mongo => {
                let uri = config
                    .mongodb_uri
                    .as_deref()
                    .ok_or(ConfigError::Missing("MONGODB_URI"))?;
                let client = create_mongo_client(uri).await?;
                Arc::new(MongoItineraryStore::new(&client, &config.mongodb_database))
            }
            StoreBackend::Memory => {
                log::warn!("Using the in-memory itinerary store; saved itineraries will not survive a restart");
                Arc::new(MemoryItineraryStore::new())
            }
        };

        let geocoder = NominatimGeocoder::new(
            &config.geocoding_base_url,
            &config.geocoding_user_agent,
            config.outbound_timeout,
        )?;

        let generator = OpenAiGenerator::new(
            &config.openai_base_url,
            config.openai_api_key.clone(),
            config.openai_model.clone(),
            config.outbound_timeout,
        )?;

        Ok(Self::new(
            store,
            Arc::new(geocoder),
            Arc::new(generator),
            PreviewSettings {
                city_check_policy: config.city_check_policy,
                verify_generated: config.verify_generated,
            },
        ))
    }
}
