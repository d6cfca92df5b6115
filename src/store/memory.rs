//! In-memory store for tests and local development.
//!
//! Implements the same contract as the Mongo backend, including both unique
//! constraints, so pipeline behavior can be exercised without a database.

use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{Booking, Event};

use super::RecordStore;

#[derive(Default)]
struct Records {
    events: Vec<Event>,
    bookings: Vec<Booking>,
}

/// In-process [`RecordStore`] with no persistence
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        let mut records = self.records.write().unwrap();
        if records.events.iter().any(|e| e.slug == event.slug) {
            return Err(StoreError::DuplicateSlug {
                slug: event.slug.clone(),
            });
        }
        records.events.push(event.clone());
        Ok(())
    }

    async fn replace_event(&self, event: &Event) -> Result<()> {
        let mut records = self.records.write().unwrap();
        if records
            .events
            .iter()
            .any(|e| e.slug == event.slug && e.id != event.id)
        {
            return Err(StoreError::DuplicateSlug {
                slug: event.slug.clone(),
            });
        }
        match records.events.iter_mut().find(|e| e.id == event.id) {
            Some(stored) => {
                *stored = event.clone();
                Ok(())
            }
            None => Err(StoreError::EventNotFound { id: event.id }),
        }
    }

    async fn find_event_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let records = self.records.read().unwrap();
        Ok(records.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        let records = self.records.read().unwrap();
        Ok(records.events.iter().find(|e| e.slug == slug).cloned())
    }

    async fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool> {
        let records = self.records.read().unwrap();
        Ok(records
            .events
            .iter()
            .any(|e| e.slug == slug && Some(e.id) != exclude))
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let records = self.records.read().unwrap();
        let mut events = records.events.clone();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().unwrap();
        let before = records.events.len();
        records.events.retain(|e| e.id != id);
        Ok(records.events.len() < before)
    }

    async fn insert_booking(&self, booking: &Booking) -> Result<()> {
        let mut records = self.records.write().unwrap();
        if records
            .bookings
            .iter()
            .any(|b| b.event_id == booking.event_id && b.email == booking.email)
        {
            return Err(StoreError::DuplicateBooking);
        }
        records.bookings.push(booking.clone());
        Ok(())
    }

    async fn booking_exists(&self, event_id: Uuid, email: &str) -> Result<bool> {
        let records = self.records.read().unwrap();
        Ok(records
            .bookings
            .iter()
            .any(|b| b.event_id == event_id && b.email == email))
    }

    async fn count_bookings(&self, event_id: Uuid) -> Result<u64> {
        let records = self.records.read().unwrap();
        Ok(records
            .bookings
            .iter()
            .filter(|b| b.event_id == event_id)
            .count() as u64)
    }
}
