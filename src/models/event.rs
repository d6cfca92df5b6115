//! Event records and field normalization.
//!
//! An [`EventDraft`] carries raw caller input; the pipeline turns it into a
//! persist-ready [`Event`] or fails with a [`ValidationError`]. The slug,
//! date, and time normalizers live here as pure functions so they can be
//! exercised without a store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

/// ASCII word chars only: slugs must stay lowercase ASCII, and characters
/// like `𝙰` have no lowercase form for `to_lowercase` to produce.
static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("non-slug char regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static HYPHEN_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").expect("hyphen run regex"));

/// 12-hour clock with meridiem. Hour 1-12 (optional leading zero),
/// minute 00-59, at most one whitespace char before AM/PM.
static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(0?[1-9]|1[0-2]):([0-5][0-9])\s?(AM|PM)$").expect("time regex")
});

/// How an event is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Online,
    Offline,
    Hybrid,
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(ValidationError::InvalidMode {
                value: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Hybrid => "hybrid",
        };
        f.write_str(s)
    }
}

/// A persisted event record.
///
/// `slug` is globally unique and derived from `title`; `time` is in
/// canonical `H:MM AM/PM` form. Both are guaranteed by the pipeline before
/// the record reaches a store, and re-checked by the storage indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: String,
    pub mode: Mode,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Raw candidate input for creating or re-saving an event.
///
/// Everything is a plain string; the pipeline owns parsing and
/// normalization so callers (request handlers) stay thin.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub overview: String,
    pub image: String,
    pub venue: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub mode: String,
    pub audience: String,
    pub agenda: Vec<String>,
    pub organizer: String,
    pub tags: Vec<String>,
}

/// Derive the base slug for a title: lowercase, strip everything outside
/// ASCII word chars/whitespace/hyphens, collapse whitespace runs to single
/// hyphens, collapse hyphen runs to one.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RE.replace_all(stripped.trim(), "-");
    HYPHEN_RUN_RE.replace_all(&hyphenated, "-").into_owned()
}

/// Normalize a 12-hour clock time to canonical `H:MM AM/PM` form.
///
/// Trims the input, uppercases the meridiem, and places exactly one space
/// before it. Idempotent: normalizing the output yields it unchanged.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let caps = TIME_RE
        .captures(trimmed)
        .ok_or_else(|| ValidationError::InvalidTimeFormat {
            value: input.to_string(),
        })?;
    Ok(format!(
        "{}:{} {}",
        &caps[1],
        &caps[2],
        caps[3].to_ascii_uppercase()
    ))
}

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_event_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }
    Err(ValidationError::InvalidDate {
        value: input.to_string(),
    })
}
