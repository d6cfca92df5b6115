//! Event creation, re-save, lookup, listing, and deletion against the
//! in-memory store.

use std::time::Duration;

use devevents_store::{ops, EventDraft, MemoryStore, StoreError, ValidationError};

fn trace_init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn draft(title: &str) -> EventDraft {
    EventDraft {
        title: title.into(),
        description: "A day of talks".into(),
        overview: "Talks, workshops, and a hallway track".into(),
        image: "https://cdn.example.com/banner.png".into(),
        venue: "Convention Center".into(),
        location: "Amsterdam".into(),
        date: "2025-11-02".into(),
        time: "9:00am".into(),
        mode: "hybrid".into(),
        audience: "backend developers".into(),
        agenda: vec!["Registration".into(), "Keynote".into()],
        organizer: "DevEvents".into(),
        tags: vec!["cloud".into(), "rust".into()],
    }
}

#[tokio::test]
async fn identical_titles_get_suffixed_slugs() {
    trace_init();
    let store = MemoryStore::new();

    let first = ops::create_event(&store, &draft("Cloud Native Summit 2025!"))
        .await
        .unwrap();
    assert_eq!(first.slug, "cloud-native-summit-2025");
    assert_eq!(first.time, "9:00 AM");

    let second = ops::create_event(&store, &draft("Cloud Native Summit 2025!"))
        .await
        .unwrap();
    assert_eq!(second.slug, "cloud-native-summit-2025-1");

    let third = ops::create_event(&store, &draft("Cloud Native Summit 2025!"))
        .await
        .unwrap();
    assert_eq!(third.slug, "cloud-native-summit-2025-2");
}

#[tokio::test]
async fn resave_without_title_change_keeps_slug() {
    let store = MemoryStore::new();
    let original = ops::create_event(&store, &draft("Rust Forum")).await.unwrap();
    assert_eq!(original.slug, "rust-forum");

    // A newcomer with the same title takes the next suffix
    let newcomer = ops::create_event(&store, &draft("Rust Forum")).await.unwrap();
    assert_eq!(newcomer.slug, "rust-forum-1");

    // Re-saving the original with an unchanged title must not re-derive
    let mut changes = draft("Rust Forum");
    changes.venue = "Side Hall".into();
    let updated = ops::update_event(&store, original.id, &changes)
        .await
        .unwrap();
    assert_eq!(updated.slug, "rust-forum");
    assert_eq!(updated.venue, "Side Hall");
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at >= original.updated_at);
}

#[tokio::test]
async fn title_change_rederives_slug_excluding_self() {
    let store = MemoryStore::new();
    let event = ops::create_event(&store, &draft("Rust Forum")).await.unwrap();
    let other = ops::create_event(&store, &draft("Async Days")).await.unwrap();
    assert_eq!(other.slug, "async-days");

    // New title colliding with another event's slug picks up a suffix
    let renamed = ops::update_event(&store, event.id, &draft("Async Days"))
        .await
        .unwrap();
    assert_eq!(renamed.slug, "async-days-1");

    // Renaming back is deterministic and does not collide with itself
    let back = ops::update_event(&store, event.id, &draft("Rust Forum"))
        .await
        .unwrap();
    assert_eq!(back.slug, "rust-forum");
}

#[tokio::test]
async fn invalid_fields_are_rejected_before_persistence() {
    let store = MemoryStore::new();

    let mut bad_time = draft("Timing");
    bad_time.time = "13:00 PM".into();
    let err = ops::create_event(&store, &bad_time).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidTimeFormat { .. })
    ));

    let mut bad_date = draft("Dating");
    bad_date.date = "2026-02-30".into();
    let err = ops::create_event(&store, &bad_date).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidDate { .. })
    ));

    let mut bad_mode = draft("Moding");
    bad_mode.mode = "in-person".into();
    let err = ops::create_event(&store, &bad_mode).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidMode { .. })
    ));

    let mut no_agenda = draft("Agendaless");
    no_agenda.agenda = vec!["   ".into()];
    let err = ops::create_event(&store, &no_agenda).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyAgenda)
    ));

    let mut no_tags = draft("Tagless");
    no_tags.tags = vec![];
    let err = ops::create_event(&store, &no_tags).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::EmptyTags)
    ));

    let mut no_venue = draft("Venueless");
    no_venue.venue = "  ".into();
    let err = ops::create_event(&store, &no_venue).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::MissingField { field: "venue" })
    ));

    let err = ops::create_event(&store, &draft("!!!")).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::InvalidTitle { .. })
    ));

    // Nothing was persisted by any failed attempt
    assert!(ops::list_events(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn slug_lookup_is_case_and_whitespace_tolerant() {
    let store = MemoryStore::new();
    ops::create_event(&store, &draft("Cloud Native Summit 2025!"))
        .await
        .unwrap();

    let found = ops::find_event_by_slug(&store, "  CLOUD-NATIVE-SUMMIT-2025 ")
        .await
        .unwrap();
    assert!(found.is_some());

    let missing = ops::find_event_by_slug(&store, "no-such-event")
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn listing_is_newest_first() {
    let store = MemoryStore::new();
    for title in ["First", "Second", "Third"] {
        ops::create_event(&store, &draft(title)).await.unwrap();
        // Keep created_at strictly increasing
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let titles: Vec<String> = ops::list_events(&store)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(titles, ["Third", "Second", "First"]);
}

#[tokio::test]
async fn delete_is_refused_while_bookings_exist() {
    let store = MemoryStore::new();
    let event = ops::create_event(&store, &draft("Guarded")).await.unwrap();
    ops::create_booking(&store, event.id, "dev@example.com")
        .await
        .unwrap();

    let err = ops::delete_event(&store, event.id).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::EventHasBookings { count: 1, .. }
    ));

    // Still listed
    assert_eq!(ops::list_events(&store).await.unwrap().len(), 1);

    let unguarded = ops::create_event(&store, &draft("Unguarded")).await.unwrap();
    ops::delete_event(&store, unguarded.id).await.unwrap();
    assert!(ops::find_event_by_slug(&store, "unguarded")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn deleting_unknown_event_is_not_found() {
    let store = MemoryStore::new();
    let err = ops::delete_event(&store, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::EventNotFound { .. }));
}
