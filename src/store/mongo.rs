//! MongoDB-backed record store.
//!
//! The connector establishes the client, and bootstraps the indexes that
//! make slug and booking uniqueness authoritative across process instances:
//! in-process pipeline checks are best-effort UX, the indexes are the
//! source of truth. Every operation acquires the shared handle through the
//! injected [`ConnectionCache`].

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::connection::{Connect, ConnectionCache};
use crate::error::{AcquireError, ConnectionError, Result, StoreError};
use crate::models::{Booking, Event};

use super::RecordStore;

const EVENTS_COLLECTION: &str = "events";
const BOOKINGS_COLLECTION: &str = "bookings";

/// Duplicate key error code from the server
const DUPLICATE_KEY: i32 = 11000;

/// Established connection: typed collections over one client
#[derive(Clone, Debug)]
pub struct MongoHandle {
    events: Collection<Event>,
    bookings: Collection<Booking>,
}

impl MongoHandle {
    fn new(database: &mongodb::Database) -> Self {
        Self {
            events: database.collection(EVENTS_COLLECTION),
            bookings: database.collection(BOOKINGS_COLLECTION),
        }
    }

    /// Declare the indexes backing the uniqueness invariants: unique `slug`
    /// on events; `event_id` plus a unique `(event_id, email)` compound on
    /// bookings. Idempotent on the server side.
    async fn ensure_indexes(&self) -> mongodb::error::Result<()> {
        let unique_slug = IndexModel::builder()
            .keys(doc! { "slug": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.events.create_index(unique_slug, None).await?;

        let by_event = IndexModel::builder().keys(doc! { "event_id": 1 }).build();
        self.bookings.create_index(by_event, None).await?;

        let unique_pair = IndexModel::builder()
            .keys(doc! { "event_id": 1, "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.bookings.create_index(unique_pair, None).await?;

        Ok(())
    }
}

/// Connects to MongoDB using the explicit config, or the environment when
/// none was given. Configuration is resolved at connect time so a missing
/// connection string surfaces at the first acquisition.
pub struct MongoConnector {
    config: Option<StoreConfig>,
}

impl MongoConnector {
    pub fn from_env() -> Self {
        Self { config: None }
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

#[async_trait]
impl Connect for MongoConnector {
    type Handle = MongoHandle;

    async fn connect(&self) -> std::result::Result<MongoHandle, AcquireError> {
        let config = match &self.config {
            Some(config) => config.clone(),
            None => StoreConfig::from_env()?,
        };

        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|err| ConnectionError::new(err.to_string()))?;
        let handle = MongoHandle::new(&client.database(&config.database));

        handle
            .ensure_indexes()
            .await
            .map_err(|err| ConnectionError::new(err.to_string()))?;

        tracing::info!(database = %config.database, "document store connected");
        Ok(handle)
    }
}

/// MongoDB-backed [`RecordStore`]
pub struct MongoStore {
    cache: ConnectionCache<MongoConnector>,
}

impl MongoStore {
    /// Store configured from `MONGODB_URI` / `MONGODB_DB`
    pub fn from_env() -> Self {
        Self::with_connector(MongoConnector::from_env())
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_connector(MongoConnector::with_config(config))
    }

    pub fn with_connector(connector: MongoConnector) -> Self {
        Self {
            cache: ConnectionCache::new(connector),
        }
    }

    /// Acquire the live handle through the process-wide cache.
    ///
    /// # Errors
    ///
    /// `Config` when the connection string is absent, `Connection` when the
    /// attempt fails; the cache retries on the next call.
    pub async fn handle(&self) -> Result<MongoHandle> {
        Ok(self.cache.acquire().await?)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_err)) => write_err.code == DUPLICATE_KEY,
        ErrorKind::Command(command_err) => command_err.code == DUPLICATE_KEY,
        _ => false,
    }
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        let handle = self.handle().await?;
        match handle.events.insert_one(event, None).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::DuplicateSlug {
                slug: event.slug.clone(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    async fn replace_event(&self, event: &Event) -> Result<()> {
        let handle = self.handle().await?;
        let filter = doc! { "_id": event.id.to_string() };
        let result = match handle.events.replace_one(filter, event, None).await {
            Ok(result) => result,
            Err(err) if is_duplicate_key(&err) => {
                return Err(StoreError::DuplicateSlug {
                    slug: event.slug.clone(),
                })
            }
            Err(err) => return Err(err.into()),
        };
        if result.matched_count == 0 {
            return Err(StoreError::EventNotFound { id: event.id });
        }
        Ok(())
    }

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let handle = self.handle().await?;
        Ok(handle
            .events
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?)
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let handle = self.handle().await?;
        Ok(handle.events.find_one(doc! { "slug": slug }, None).await?)
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool> {
        let handle = self.handle().await?;
        let filter = match exclude {
            Some(id) => doc! { "slug": slug, "_id": { "$ne": id.to_string() } },
            None => doc! { "slug": slug },
        };
        let count = handle.events.count_documents(filter, None).await?;
        Ok(count > 0)
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let handle = self.handle().await?;
        let newest_first = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = handle.events.find(doc! {}, newest_first).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let handle = self.handle().await?;
        let result = handle
            .events
            .delete_one(doc! { "_id": id.to_string() }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        let handle = self.handle().await?;
        match handle.bookings.insert_one(booking, None).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::DuplicateBooking),
            Err(err) => Err(err.into()),
        }
    }

    async fn booking_exists(&self, event_id: Uuid, email: &str) -> Result<bool> {
        let handle = self.handle().await?;
        let filter = doc! { "event_id": event_id.to_string(), "email": email };
        Ok(handle.bookings.find_one(filter, None).await?.is_some())
    }

    async fn count_bookings(&self, event_id: Uuid) -> Result<u64> {
        let handle = self.handle().await?;
        Ok(handle
            .bookings
            .count_documents(doc! { "event_id": event_id.to_string() }, None)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a live server.
    // Run with: MONGODB_URI=mongodb://... cargo test -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn connect_and_bootstrap_indexes() {
        let store = MongoStore::from_env();
        store.handle().await.expect("connection failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn roundtrip_event_by_slug() {
        let store = MongoStore::from_env();
        let slug = format!("mongo-roundtrip-{}", Uuid::new_v4());
        assert!(store.find_event_by_slug(&slug).await.unwrap().is_none());
    }
}
