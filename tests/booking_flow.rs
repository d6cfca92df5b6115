//! Booking validation: email normalization, referential integrity, and the
//! one-booking-per-email-per-event rule.

use devevents_store::{ops, EventDraft, MemoryStore, RecordStore, StoreError, ValidationError};
use uuid::Uuid;

fn event_draft(title: &str) -> EventDraft {
    EventDraft {
        title: title.into(),
        description: "Evening meetup".into(),
        overview: "Two talks and pizza".into(),
        image: "https://cdn.example.com/meetup.png".into(),
        venue: "Office 4F".into(),
        location: "Oslo".into(),
        date: "2026-01-20".into(),
        time: "6:30 PM".into(),
        mode: "offline".into(),
        audience: "local developers".into(),
        agenda: vec!["Talk one".into(), "Talk two".into()],
        organizer: "DevEvents".into(),
        tags: vec!["meetup".into()],
    }
}

#[tokio::test]
async fn booking_requires_an_existing_event() {
    let store = MemoryStore::new();
    let ghost = Uuid::new_v4();

    let err = ops::create_booking(&store, ghost, "dev@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EventNotFound { id } if id == ghost));
}

#[tokio::test]
async fn email_is_normalized_before_storage() {
    let store = MemoryStore::new();
    let event = ops::create_event(&store, &event_draft("Normalize Me"))
        .await
        .unwrap();

    let booking = ops::create_booking(&store, event.id, "  Dev@Example.COM ")
        .await
        .unwrap();
    assert_eq!(booking.email, "dev@example.com");
    assert_eq!(booking.event_id, event.id);

    assert!(store
        .booking_exists(event.id, "dev@example.com")
        .await
        .unwrap());
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let store = MemoryStore::new();
    let event = ops::create_event(&store, &event_draft("Strict Inbox"))
        .await
        .unwrap();

    for bad in ["not-an-email", "a@b", "a b@example.com", ""] {
        let err = ops::create_booking(&store, event.id, bad).await.unwrap_err();
        assert!(
            matches!(
                err,
                StoreError::Validation(ValidationError::InvalidEmail { .. })
            ),
            "expected InvalidEmail for {bad:?}"
        );
    }
    assert_eq!(store.count_bookings(event.id).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_pair_is_rejected_but_other_pairs_are_fine() {
    let store = MemoryStore::new();
    let event = ops::create_event(&store, &event_draft("Popular"))
        .await
        .unwrap();
    let other = ops::create_event(&store, &event_draft("Also Popular"))
        .await
        .unwrap();

    ops::create_booking(&store, event.id, "dev@example.com")
        .await
        .unwrap();

    // Same pair, including via a differently-cased email, is a duplicate
    let err = ops::create_booking(&store, event.id, "DEV@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateBooking));

    // Different email on the same event, and same email on a different
    // event, both pass
    ops::create_booking(&store, event.id, "other@example.com")
        .await
        .unwrap();
    ops::create_booking(&store, other.id, "dev@example.com")
        .await
        .unwrap();

    assert_eq!(store.count_bookings(event.id).await.unwrap(), 2);
    assert_eq!(store.count_bookings(other.id).await.unwrap(), 1);
}
