//! Core record types with validation.

use std::cmp::Reverse;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the first `len` characters, for compact display.
            pub fn short(&self, len: usize) -> &str {
                self.0
                    .char_indices()
                    .nth(len)
                    .map_or(self.0.as_str(), |(idx, _)| &self.0[..idx])
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated entry identifier.
    ///
    /// Entry IDs are random UUIDs assigned by the store; uniqueness is the
    /// store's responsibility.
    EntryId, "entry ID"
);

define_string_id!(
    /// A validated timesheet identifier.
    TimesheetId, "timesheet ID"
);

/// A single tracked work interval.
///
/// An entry without `end_time` is running; its duration grows with the
/// reference instant it is measured against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub timesheet_id: TimesheetId,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Entry {
    /// Returns true while the entry has no end time.
    pub const fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

/// A named container of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: TimesheetId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Trims an entry name, rejecting names that are blank.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field: "name" });
    }
    Ok(trimmed.to_string())
}

/// Normalizes a user-supplied category. Blank categories become `None`.
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Sorts entries for display: running entries first, then newest start first.
pub fn sort_entries_for_display(entries: &mut [Entry]) {
    entries.sort_by_key(|e| (!e.is_running(), Reverse(e.start_time)));
}

/// Sorts timesheets newest first.
pub fn sort_timesheets_for_display(timesheets: &mut [Timesheet]) {
    timesheets.sort_by_key(|t| Reverse(t.created_at));
}
