#![allow(dead_code)]

use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use serde_json::{json, Value};
use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use itinerary_planner_api::{
    db::itinerary_store::{ItineraryStore, MemoryItineraryStore, StoreError},
    models::itinerary::{Itinerary, NewItinerary},
    routes,
    services::{
        generation_service::{GenerationError, ItineraryGenerator},
        geocoding_service::{CityCheckPolicy, CityLookup, GeocodingError},
        itinerary_schema::ItinerarySchema,
    },
    state::{AppState, PreviewSettings},
};

/// How the stub geocoder answers.
#[derive(Clone, Copy)]
pub enum Geocode {
    Exists,
    Missing,
    Unreachable,
}

pub struct StubGeocoder {
    answer: Geocode,
    pub calls: AtomicUsize,
}

#[async_trait]
impl CityLookup for StubGeocoder {
    async fn lookup(&self, _city: &str) -> Result<bool, GeocodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Geocode::Exists => Ok(true),
            Geocode::Missing => Ok(false),
            Geocode::Unreachable => Err(GeocodingError::Endpoint(url::ParseError::EmptyHost)),
        }
    }
}

/// How the stub generator answers.
#[derive(Clone)]
pub enum Generate {
    /// A document that satisfies the requested schema.
    Conforming,
    /// A fixed document, whatever was asked for.
    Fixed(Value),
    Failing,
}

pub struct StubGenerator {
    answer: Generate,
    pub calls: AtomicUsize,
}

#[async_trait]
impl ItineraryGenerator for StubGenerator {
    async fn generate(
        &self,
        city: &str,
        schema: &ItinerarySchema,
    ) -> Result<Value, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Generate::Conforming => Ok(conforming_itinerary(city, schema.day_count)),
            Generate::Fixed(value) => Ok(value.clone()),
            Generate::Failing => Err(GenerationError::MissingOutput),
        }
    }
}

pub fn conforming_itinerary(city: &str, days: u32) -> Value {
    let days: Vec<Value> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "title": format!("Day {} in {}", day, city),
                "activities": ["Morning walk", "Local dinner"],
            })
        })
        .collect();
    json!({ "city": city, "days": days })
}

/// A store whose backing database is always down.
pub struct FailingStore;

impl FailingStore {
    fn outage() -> StoreError {
        let refused = io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused");
        StoreError::Database(mongodb::error::Error::from(refused))
    }
}

#[async_trait]
impl ItineraryStore for FailingStore {
    async fn insert(&self, _new: NewItinerary) -> Result<Itinerary, StoreError> {
        Err(Self::outage())
    }

    async fn list(&self) -> Result<Vec<Itinerary>, StoreError> {
        Err(Self::outage())
    }

    async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Itinerary>, StoreError> {
        Err(Self::outage())
    }

    async fn delete_by_id(&self, _id: ObjectId) -> Result<Option<Itinerary>, StoreError> {
        Err(Self::outage())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Err(Self::outage())
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

pub struct TestApp {
    pub state: AppState,
    pub geocoder: Arc<StubGeocoder>,
    pub generator: Arc<StubGenerator>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(Geocode::Exists, Generate::Conforming, PreviewSettings::default())
    }

    pub fn with(geocode: Geocode, generate: Generate, preview: PreviewSettings) -> Self {
        Self::build(
            Arc::new(MemoryItineraryStore::new()),
            geocode,
            generate,
            preview,
        )
    }

    pub fn with_store(store: Arc<dyn ItineraryStore>) -> Self {
        Self::build(
            store,
            Geocode::Exists,
            Generate::Conforming,
            PreviewSettings::default(),
        )
    }

    fn build(
        store: Arc<dyn ItineraryStore>,
        geocode: Geocode,
        generate: Generate,
        preview: PreviewSettings,
    ) -> Self {
        let geocoder = Arc::new(StubGeocoder {
            answer: geocode,
            calls: AtomicUsize::new(0),
        });
        let generator = Arc::new(StubGenerator {
            answer: generate,
            calls: AtomicUsize::new(0),
        });
        let state = AppState::new(
            store,
            geocoder.clone(),
            generator.clone(),
            preview,
        );

        Self {
            state,
            geocoder,
            generator,
        }
    }

    pub fn fail_open() -> PreviewSettings {
        PreviewSettings {
            city_check_policy: CityCheckPolicy::FailOpen,
            ..PreviewSettings::default()
        }
    }

    pub fn unverified() -> PreviewSettings {
        PreviewSettings {
            verify_generated: false,
            ..PreviewSettings::default()
        }
    }

    pub fn geocoder_calls(&self) -> usize {
        self.geocoder.calls.load(Ordering::SeqCst)
    }

    pub fn generator_calls(&self) -> usize {
        self.generator.calls.load(Ordering::SeqCst)
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors())
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(self.state.clone()))
            .app_data(routes::json_config())
            .configure(routes::configure)
    }
}
