use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use std::time::Duration;

use crate::{
    db::itinerary_store::{ItineraryStore, StoreError},
    models::itinerary::{Itinerary, NewItinerary},
};

pub const ITINERARY_COLLECTION: &str = "itineraries";

pub async fn create_mongo_client(uri: &str) -> Result<Client, mongodb::error::Error> {
    log::info!("Connecting to MongoDB");

    let mut client_options = ClientOptions::parse(uri).await?;

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client = Client::with_options(client_options)?;

    // A failed ping is not fatal; the driver reconnects on demand.
    match client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
    {
        Ok(_) => log::info!("Connected to MongoDB and verified with ping"),
        Err(e) => log::warn!(
            "Connected to MongoDB but ping failed, store operations may fail: {}",
            e
        ),
    }

    Ok(client)
}

#[derive(Clone)]
pub struct MongoItineraryStore {
    database: Database,
    collection: Collection<Itinerary>,
}

impl MongoItineraryStore {
    pub fn new(client: &Client, database: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection(ITINERARY_COLLECTION);
        Self {
            database,
            collection,
        }
    }
}

#[async_trait]
impl ItineraryStore for MongoItineraryStore {
    async fn insert(&self, new: NewItinerary) -> Result<Itinerary, StoreError> {
        let itinerary = Itinerary::create(new);
        self.collection.insert_one(&itinerary).await?;
        Ok(itinerary)
    }

    async fn list(&self) -> Result<Vec<Itinerary>, StoreError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Itinerary>, StoreError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Itinerary>, StoreError> {
        Ok(self.collection.find_one_and_delete(doc! { "_id": id }).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}
