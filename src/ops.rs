//! Operations consumed by the HTTP/rendering layer.
//!
//! Thin orchestration: run the relevant pipeline, commit through the store,
//! return the committed record. On any validation failure nothing is
//! persisted.

use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{Booking, Event, EventDraft};
use crate::pipeline;
use crate::store::RecordStore;

/// Create an event from raw input.
pub async fn create_event<S: RecordStore>(store: &S, draft: &EventDraft) -> Result<Event> {
    let event = pipeline::normalize_new_event(draft, store).await?;
    store.insert_event(&event).await?;
    tracing::info!(slug = %event.slug, "event created");
    Ok(event)
}

/// Re-save an event. The slug changes only when the title does.
pub async fn update_event<S: RecordStore>(
    store: &S,
    id: Uuid,
    draft: &EventDraft,
) -> Result<Event> {
    let existing = store
        .find_event_by_id(id)
        .await?
        .ok_or(StoreError::EventNotFound { id })?;
    let event = pipeline::normalize_event_update(&existing, draft, store).await?;
    store.replace_event(&event).await?;
    tracing::info!(slug = %event.slug, "event updated");
    Ok(event)
}

/// Look up an event by slug. The slug is trimmed and lowercased first, so
/// request-path casing never causes a spurious miss.
pub async fn find_event_by_slug<S: RecordStore>(store: &S, slug: &str) -> Result<Option<Event>> {
    let slug = slug.trim().to_lowercase();
    store.find_event_by_slug(&slug).await
}

/// All events, newest first.
pub async fn list_events<S: RecordStore>(store: &S) -> Result<Vec<Event>> {
    store.list_events().await
}

/// Book a seat: validates the email, the event reference, and the
/// one-booking-per-email-per-event rule before committing.
pub async fn create_booking<S: RecordStore>(
    store: &S,
    event_id: Uuid,
    email: &str,
) -> Result<Booking> {
    let booking = pipeline::validate_booking(event_id, email, store).await?;
    store.insert_booking(&booking).await?;
    tracing::info!(event_id = %booking.event_id, "booking created");
    Ok(booking)
}

/// Delete an event. Restrict policy: an event with live bookings cannot be
/// deleted; bookings are never orphaned or silently cascaded.
pub async fn delete_event<S: RecordStore>(store: &S, id: Uuid) -> Result<()> {
    let count = store.count_bookings(id).await?;
    if count > 0 {
        tracing::warn!(event_id = %id, bookings = count, "delete refused");
        return Err(StoreError::EventHasBookings { id, count });
    }
    if !store.delete_event(id).await? {
        return Err(StoreError::EventNotFound { id });
    }
    Ok(())
}
