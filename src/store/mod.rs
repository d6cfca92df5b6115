//! Persistence primitives.
//!
//! [`RecordStore`] is the storage seam: the pipeline stages are pure
//! functions of (candidate record, query capability), and this trait is the
//! query capability. The Mongo backend is the production implementation;
//! [`MemoryStore`] implements the same contract, including both unique
//! constraints, for tests and local development.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, Event};

pub use memory::MemoryStore;
pub use mongo::{MongoConnector, MongoHandle, MongoStore};

/// Minimal persistence operations used by the normalization and validation
/// pipelines. No business logic; implementations enforce only the declared
/// storage-level uniqueness constraints (unique `slug`, unique
/// `(event_id, email)`) as a second line of defense behind the pipelines.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a normalized event.
    ///
    /// Fails with `DuplicateSlug` when the storage unique index rejects the
    /// slug: callers lost a race against another writer.
    async fn insert_event(&self, event: &Event) -> Result<()>;

    /// Replace a stored event wholesale (re-save path).
    async fn replace_event(&self, event: &Event) -> Result<()>;

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>>;

    /// Whether a slug is already used by an event other than `exclude`.
    /// The exclusion keeps re-saves from colliding with themselves.
    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool>;

    /// All events, newest first (`created_at` descending).
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Delete an event by id; returns whether a record was removed.
    async fn delete_event(&self, id: Uuid) -> Result<bool>;

    /// Insert a validated booking.
    ///
    /// Fails with `DuplicateBooking` when the compound unique index rejects
    /// the `(event_id, email)` pair.
    async fn insert_booking(&self, booking: &Booking) -> Result<()>;

    async fn booking_exists(&self, event_id: Uuid, email: &str) -> Result<bool>;

    async fn count_bookings(&self, event_id: Uuid) -> Result<u64>;
}
