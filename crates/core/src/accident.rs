//! Accident report intake parsing, records, and projections.
//!
//! Submissions arrive as raw form strings. [`ReportSubmission::normalize`]
//! turns them into a [`NewAccident`] ready for storage, or a [`FormatError`]
//! naming the first field that could not be parsed. Stored records are
//! reshaped into [`AccidentProjection`]s for display and email summaries.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Calendar date format accepted on intake and produced by projections.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wall-clock format produced by projections (minute granularity).
pub const TIME_FORMAT: &str = "%H:%M";

/// Maximum length of the route label (characters).
pub const MAX_ROUTE_LENGTH: usize = 100;

/// Maximum length of the location description (characters).
pub const MAX_LOCATION_LENGTH: usize = 100;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A submitted report field could not be parsed or failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Field '{0}' must not be empty")]
    MissingField(&'static str),

    #[error("Field '{0}' must not contain control characters")]
    ControlCharacter(&'static str),

    #[error("Field '{field}' exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid date '{0}'. Expected format YYYY-MM-DD")]
    Date(String),

    #[error("Invalid time '{0}'. Expected format HH:MM")]
    Time(String),

    #[error("Invalid casualties '{0}'. Expected a non-negative whole number")]
    Casualties(String),
}

impl From<FormatError> for CoreError {
    fn from(err: FormatError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw report fields as submitted by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSubmission {
    pub route: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub casualties: String,
}

/// A validated report, ready to be written to the accident store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccident {
    pub route: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub casualties: i32,
}

/// A persisted accident report. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccidentRecord {
    pub id: DbId,
    pub route: String,
    pub location: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub casualties: i32,
    pub created_at: Timestamp,
}

/// Display-ready view of an [`AccidentRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccidentProjection {
    pub location: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub casualties: i32,
}

impl From<&AccidentRecord> for AccidentProjection {
    fn from(record: &AccidentRecord) -> Self {
        Self {
            location: record.location.clone(),
            date: record.date.format(DATE_FORMAT).to_string(),
            time: record.time.format(TIME_FORMAT).to_string(),
            casualties: record.casualties,
        }
    }
}

impl ReportSubmission {
    /// Validate every field and produce a [`NewAccident`].
    ///
    /// Fields are checked in submission order: route, location, date, time,
    /// casualties. The first failure is returned.
    pub fn normalize(&self) -> Result<NewAccident, FormatError> {
        Ok(NewAccident {
            route: normalize_route(&self.route)?,
            location: required_text("location", &self.location, MAX_LOCATION_LENGTH)?,
            date: parse_date(&self.date)?,
            time: parse_time(&self.time)?,
            casualties: parse_casualties(&self.casualties)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Trim a route label and check it is non-empty and within length limits.
pub fn normalize_route(route: &str) -> Result<String, FormatError> {
    required_text("route", route, MAX_ROUTE_LENGTH)
}

/// Parse a `YYYY-MM-DD` date: four-digit year, two-digit month and day.
/// Unpadded fields and trailing text are rejected.
pub fn parse_date(input: &str) -> Result<NaiveDate, FormatError> {
    let invalid = || FormatError::Date(input.to_string());

    let trimmed = input.trim();
    let shape_ok = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// Parse a time that begins with `HH:MM`, ignoring anything after the minutes.
///
/// The hour is the text before the first `:` (one or two digits); the minutes
/// are the one or two digits immediately after it. Seconds, if present, are
/// discarded: `"08:15:99 extra"` parses as `08:15`.
pub fn parse_time(input: &str) -> Result<NaiveTime, FormatError> {
    let invalid = || FormatError::Time(input.to_string());

    let (hour, rest) = input.trim_start().split_once(':').ok_or_else(invalid)?;
    if hour.is_empty() || hour.len() > 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let minute_len = rest.bytes().take(2).take_while(u8::is_ascii_digit).count();
    if minute_len == 0 {
        return Err(invalid());
    }
    let minute = &rest[..minute_len];

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Parse a non-negative casualty count written as plain decimal digits.
pub fn parse_casualties(input: &str) -> Result<i32, FormatError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::Casualties(input.to_string()));
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| FormatError::Casualties(input.to_string()))
}

fn required_text(field: &'static str, value: &str, max: usize) -> Result<String, FormatError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FormatError::MissingField(field));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(FormatError::ControlCharacter(field));
    }
    if trimmed.chars().count() > max {
        return Err(FormatError::TooLong { field, max });
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
