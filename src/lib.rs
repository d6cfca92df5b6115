//! devevents-store: persistence core for a developer-events platform.
//!
//! Guarantees the shape and integrity of the two persisted record types and
//! the availability of a live database handle:
//!
//! - [`connection::ConnectionCache`] memoizes one connection per process
//!   and shares any in-flight attempt among concurrent callers, so a
//!   cold-start-heavy environment never opens redundant connections;
//! - [`pipeline`] normalizes events (unique title-derived slug, calendar
//!   date, canonical 12-hour time) and validates bookings (email format,
//!   referential integrity, one booking per email per event) before
//!   anything is committed;
//! - [`store::RecordStore`] is the storage seam, with a MongoDB backend for
//!   production and an in-memory backend for tests.
//!
//! HTTP handlers, rendering, and asset uploads live elsewhere and consume
//! this crate through [`ops`].
//!
//! ```no_run
//! use devevents_store::{ops, EventDraft, MongoStore};
//!
//! # async fn run() -> devevents_store::Result<()> {
//! let store = MongoStore::from_env();
//! let draft = EventDraft {
//!     title: "Cloud Native Summit 2025!".into(),
//!     date: "2025-11-02".into(),
//!     time: "9:00am".into(),
//!     mode: "hybrid".into(),
//!     // ...remaining fields from the request
//!     # ..Default::default()
//! };
//! let event = ops::create_event(&store, &draft).await?;
//! assert_eq!(event.slug, "cloud-native-summit-2025");
//! assert_eq!(event.time, "9:00 AM");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod ops;
pub mod pipeline;
pub mod store;

pub use config::StoreConfig;
pub use connection::{Connect, ConnectionCache};
pub use error::{AcquireError, ConfigError, ConnectionError, Result, StoreError};
pub use models::{Booking, Event, EventDraft, Mode, ValidationError};
pub use store::{MemoryStore, MongoConnector, MongoHandle, MongoStore, RecordStore};
