//! Intervals derived from tracked entries.

use chrono::{DateTime, Utc};

use crate::types::Entry;

/// A record that can be measured as a time interval.
///
/// This trait lets the accounting functions work with different entry
/// representations (e.g., [`Entry`] from the store, or test fixtures).
pub trait TimedEntry {
    /// Returns when the entry started.
    fn start_time(&self) -> DateTime<Utc>;

    /// Returns when the entry ended, or `None` while it is running.
    fn end_time(&self) -> Option<DateTime<Utc>>;

    /// Returns the task name used for grouping.
    fn name(&self) -> &str;

    /// Returns the category, if any.
    fn category(&self) -> Option<&str>;
}

impl TimedEntry for Entry {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// A closed span of time. Running entries are closed at the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Builds the interval for an entry, substituting `now` for a missing end.
    pub fn of<E: TimedEntry + ?Sized>(entry: &E, now: DateTime<Utc>) -> Self {
        Self {
            start: entry.start_time(),
            end: entry.end_time().unwrap_or(now),
        }
    }

    /// Length in milliseconds, clamped at zero.
    pub fn duration_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds().max(0)
    }
}

/// Elapsed milliseconds for an entry as of `now`. Never negative.
pub fn duration_of<E: TimedEntry + ?Sized>(entry: &E, now: DateTime<Utc>) -> i64 {
    Interval::of(entry, now).duration_ms()
}
