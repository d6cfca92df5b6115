//! Persisted record types with normalization at the edges.
//!
//! All caller input is validated before persistence; invalid input returns
//! a [`ValidationError`], never a panic.

pub mod booking;
pub mod event;
pub mod validation;

pub use booking::{normalize_email, Booking};
pub use event::{normalize_time, parse_event_date, slugify, Event, EventDraft, Mode};
pub use validation::ValidationError;
