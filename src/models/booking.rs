//! Booking records and email normalization.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

/// local-part@domain with at least one dot in the domain, no whitespace
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// A booking against an event.
///
/// `event_id` is a weak reference by identity: the booking does not own the
/// event, but the event must exist when the booking is created. The pair
/// `(event_id, email)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub event_id: Uuid,
    pub email: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Build a booking from an already-validated event id and normalized
    /// email. Use the pipeline to get here from raw input.
    pub fn new(event_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            event_id,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trim, lowercase, and syntax-check an email address.
pub fn normalize_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim().to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::InvalidEmail {
            value: input.trim().to_string(),
        });
    }
    Ok(email)
}
