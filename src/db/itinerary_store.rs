use std::cmp::Reverse;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::itinerary::{Itinerary, NewItinerary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

/// Single-collection persistence for saved itineraries.
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    async fn insert(&self, new: NewItinerary) -> Result<Itinerary, StoreError>;

    /// Every record, newest first.
    async fn list(&self) -> Result<Vec<Itinerary>, StoreError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Itinerary>, StoreError>;

    /// Removes and returns the record, or `None` when nothing matched.
    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Itinerary>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}

/// Process-local store for development runs without MongoDB.
#[derive(Default)]
pub struct MemoryItineraryStore {
    itineraries: RwLock<Vec<Itinerary>>,
}

impl MemoryItineraryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItineraryStore for MemoryItineraryStore {
    async fn insert(&self, new: NewItinerary) -> Result<Itinerary, StoreError> {
        let itinerary = Itinerary::create(new);
        self.itineraries.write().await.push(itinerary.clone());
        Ok(itinerary)
    }

    async fn list(&self) -> Result<Vec<Itinerary>, StoreError> {
        let mut all = self.itineraries.read().await.clone();
        // ObjectIds grow within a process, so they order same-millisecond saves.
        all.sort_by_key(|itinerary| Reverse((itinerary.created_at, itinerary.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Itinerary>, StoreError> {
        Ok(self
            .itineraries
            .read()
            .await
            .iter()
            .find(|itinerary| itinerary.id == id)
            .cloned())
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Itinerary>, StoreError> {
        let mut itineraries = self.itineraries.write().await;
        Ok(itineraries
            .iter()
            .position(|itinerary| itinerary.id == id)
            .map(|index| itineraries.remove(index)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
