//! Pre-commit pipelines.
//!
//! Each stage is an explicit function of (candidate record, query
//! capability) returning a normalized record or a typed error, so ordering
//! is visible and every stage is independently testable. Validation runs
//! entirely before the single insert/replace: nothing is ever partially
//! persisted.
//!
//! The existence probes here are advisory. Across process instances the
//! storage unique indexes are the authoritative enforcement; a lost race
//! surfaces from the store as the same `DuplicateSlug`/`DuplicateBooking`
//! error the probes produce.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{
    normalize_email, normalize_time, parse_event_date, slugify, Booking, Event, EventDraft, Mode,
    ValidationError,
};
use crate::store::RecordStore;

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field }.into());
    }
    Ok(trimmed.to_string())
}

fn clean_entries(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive a unique slug for `title`, appending `-1`, `-2`, ... past any
/// collisions. `exclude` is the record's own id on re-save so it never
/// collides with itself. Deterministic for a given title and slug set.
pub async fn derive_slug<S>(title: &str, exclude: Option<Uuid>, store: &S) -> Result<String>
where
    S: RecordStore + ?Sized,
{
    let base = slugify(title);
    if base.is_empty() {
        return Err(ValidationError::InvalidTitle {
            value: title.to_string(),
        }
        .into());
    }

    let mut slug = base.clone();
    let mut counter = 1u32;
    while store.slug_taken(&slug, exclude).await? {
        tracing::debug!(%slug, "slug taken, trying next suffix");
        slug = format!("{base}-{counter}");
        counter += 1;
    }
    Ok(slug)
}

/// Validated field set shared by the create and re-save paths
struct NormalizedFields {
    title: String,
    description: String,
    overview: String,
    image: String,
    venue: String,
    location: String,
    date: chrono::NaiveDate,
    time: String,
    mode: Mode,
    audience: String,
    agenda: Vec<String>,
    organizer: String,
    tags: Vec<String>,
}

fn normalize_fields(draft: &EventDraft) -> Result<NormalizedFields> {
    let title = required("title", &draft.title)?;
    let description = required("description", &draft.description)?;
    let overview = required("overview", &draft.overview)?;
    let image = required("image", &draft.image)?;
    let venue = required("venue", &draft.venue)?;
    let location = required("location", &draft.location)?;
    let audience = required("audience", &draft.audience)?;
    let organizer = required("organizer", &draft.organizer)?;

    let mode: Mode = draft.mode.parse().map_err(StoreError::Validation)?;
    let date = parse_event_date(&draft.date)?;
    let time = normalize_time(&draft.time)?;

    let agenda = clean_entries(&draft.agenda);
    if agenda.is_empty() {
        return Err(ValidationError::EmptyAgenda.into());
    }
    let tags = clean_entries(&draft.tags);
    if tags.is_empty() {
        return Err(ValidationError::EmptyTags.into());
    }

    Ok(NormalizedFields {
        title,
        description,
        overview,
        image,
        venue,
        location,
        date,
        time,
        mode,
        audience,
        agenda,
        organizer,
        tags,
    })
}

/// Turn a draft into a persist-ready new event, deriving a fresh slug.
pub async fn normalize_new_event<S>(draft: &EventDraft, store: &S) -> Result<Event>
where
    S: RecordStore + ?Sized,
{
    let fields = normalize_fields(draft)?;
    let slug = derive_slug(&fields.title, None, store).await?;
    let now = Utc::now();

    Ok(Event {
        id: Uuid::new_v4(),
        title: fields.title,
        slug,
        description: fields.description,
        overview: fields.overview,
        image: fields.image,
        venue: fields.venue,
        location: fields.location,
        date: fields.date,
        time: fields.time,
        mode: fields.mode,
        audience: fields.audience,
        agenda: fields.agenda,
        organizer: fields.organizer,
        tags: fields.tags,
        created_at: now,
        updated_at: now,
    })
}

/// Re-save path: apply a draft over a stored event.
///
/// The slug is re-derived only when the title actually changed (excluding
/// the record's own id from the collision probe); an unchanged title keeps
/// the stored slug even if other events now collide with its base.
pub async fn normalize_event_update<S>(
    existing: &Event,
    draft: &EventDraft,
    store: &S,
) -> Result<Event>
where
    S: RecordStore + ?Sized,
{
    let fields = normalize_fields(draft)?;

    let slug = if fields.title == existing.title {
        existing.slug.clone()
    } else {
        derive_slug(&fields.title, Some(existing.id), store).await?
    };

    Ok(Event {
        id: existing.id,
        title: fields.title,
        slug,
        description: fields.description,
        overview: fields.overview,
        image: fields.image,
        venue: fields.venue,
        location: fields.location,
        date: fields.date,
        time: fields.time,
        mode: fields.mode,
        audience: fields.audience,
        agenda: fields.agenda,
        organizer: fields.organizer,
        tags: fields.tags,
        created_at: existing.created_at,
        updated_at: Utc::now(),
    })
}

/// Validate a candidate booking: email syntax and normalization, then the
/// referential check against the events collection, then the advisory
/// uniqueness probe.
pub async fn validate_booking<S>(event_id: Uuid, email: &str, store: &S) -> Result<Booking>
where
    S: RecordStore + ?Sized,
{
    let email = normalize_email(email)?;

    if store.find_event_by_id(event_id).await?.is_none() {
        return Err(StoreError::EventNotFound { id: event_id });
    }

    if store.booking_exists(event_id, &email).await? {
        return Err(StoreError::DuplicateBooking);
    }

    Ok(Booking::new(event_id, email))
}
