//! Validation error types
//!
//! All candidate-record input is validated before anything is persisted.
//! Invalid input returns a typed error, never a panic.

use thiserror::Error;

/// Validation error for candidate records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty or missing
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// Title contains no characters usable in a slug
    #[error("title '{value}' contains no characters usable in a slug")]
    InvalidTitle { value: String },

    /// Mode is not one of online, offline, hybrid
    #[error("invalid mode '{value}': expected online, offline, or hybrid")]
    InvalidMode { value: String },

    /// Date is not a parsable calendar date
    #[error("invalid date '{value}': expected a calendar date such as 2026-03-14")]
    InvalidDate { value: String },

    /// Time does not match the 12-hour clock pattern
    #[error("invalid time '{value}': expected H:MM AM/PM, e.g. 9:00 AM")]
    InvalidTimeFormat { value: String },

    /// Agenda must contain at least one non-blank entry
    #[error("agenda must contain at least one item")]
    EmptyAgenda,

    /// Tags must contain at least one non-blank entry
    #[error("tags must contain at least one item")]
    EmptyTags,

    /// Email does not look like local-part@domain with a dotted domain
    #[error("'{value}' is not a valid email address")]
    InvalidEmail { value: String },
}
