//! Structured error types for the persistence core.
//!
//! Uses `thiserror` for composable errors. Validation and uniqueness
//! failures are typed so callers can map them to friendly responses;
//! driver errors pass through untouched.

use thiserror::Error;
use uuid::Uuid;

use crate::models::ValidationError;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// The connection string (or database name) is not configured.
///
/// Surfaced at the first acquisition attempt, never at process start,
/// so the crate can be linked and built without the environment set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not set: define the document store connection string")]
    MissingVar { var: &'static str },
}

/// A connection attempt failed. Transient: the cache clears its in-flight
/// memo and the next acquisition retries from scratch.
#[derive(Error, Debug, Clone)]
#[error("failed to connect to document store: {message}")]
pub struct ConnectionError {
    message: String,
}

impl ConnectionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error produced by connection acquisition.
///
/// `Clone` is required: a single in-flight attempt fans its result out to
/// every concurrent waiter.
#[derive(Error, Debug, Clone)]
pub enum AcquireError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Main error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referential check failed: no event with this id
    #[error("event {id} does not exist")]
    EventNotFound { id: Uuid },

    /// Slug uniqueness violated, by the advisory check or the storage index
    #[error("an event with slug '{slug}' already exists")]
    DuplicateSlug { slug: String },

    /// (event, email) uniqueness violated, by the advisory check or the
    /// storage index
    #[error("a booking for this event and email already exists")]
    DuplicateBooking,

    /// Delete refused: bookings still reference the event
    #[error("event {id} still has {count} active bookings")]
    EventHasBookings { id: Uuid, count: u64 },

    #[error("document store error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl From<AcquireError> for StoreError {
    fn from(err: AcquireError) -> Self {
        match err {
            AcquireError::Config(e) => Self::Config(e),
            AcquireError::Connection(e) => Self::Connection(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_error_maps_into_store_error() {
        let err: StoreError = AcquireError::Config(ConfigError::MissingVar {
            var: "MONGODB_URI",
        })
        .into();
        assert!(matches!(err, StoreError::Config(_)));

        let err: StoreError = AcquireError::Connection(ConnectionError::new("refused")).into();
        assert!(matches!(err, StoreError::Connection(_)));
    }

    #[test]
    fn error_display() {
        let err = StoreError::DuplicateSlug {
            slug: "rustconf-2026".into(),
        };
        assert_eq!(
            err.to_string(),
            "an event with slug 'rustconf-2026' already exists"
        );

        let err = ConfigError::MissingVar { var: "MONGODB_URI" };
        assert!(err.to_string().contains("MONGODB_URI"));
    }
}
