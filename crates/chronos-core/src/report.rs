//! Grouped totals for summaries and exports.
//!
//! # Grouping
//!
//! Entries are bucketed by category (entries without one land in a separate
//! uncategorized bucket) and then by exact task name. Per-name and
//! per-category durations are plain sums of entry durations, so they reflect
//! everything logged against that task even when it overlaps other work.
//!
//! # Totals
//!
//! The grand total is reported twice: `smart_total_ms` is the union of all
//! intervals (see [`merged_duration`]) and `raw_total_ms` the naive sum. When
//! entries overlap, the smart total is smaller than the sum of the category
//! totals; both values are always available so callers can show the
//! difference.
//!
//! # Ordering
//!
//! Items within a category and the named categories themselves are sorted by
//! duration descending. Sorting is stable over buckets kept in the order they
//! were first seen, so ties keep the input order.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duration::{format_rounded_decimal, ms_to_hours};
use crate::interval::{TimedEntry, duration_of};
use crate::merge::{merged_duration, raw_total};
use crate::rounding::round_to_quarter_hour;

/// Label used for uncategorized time in exports.
pub const UNCATEGORIZED_LABEL: &str = "other";

/// Time logged against one task name within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameTotal {
    pub name: String,
    pub count: usize,
    pub duration_ms: i64,
}

/// All time logged in one category, broken down by task name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    /// `None` for the uncategorized bucket.
    pub category: Option<String>,
    pub items: Vec<NameTotal>,
    pub total_duration_ms: i64,
    pub entry_count: usize,
}

impl CategoryGroup {
    pub const fn is_uncategorized(&self) -> bool {
        self.category.is_none()
    }
}

/// A category's entries in input order.
struct Bucket<'a, E> {
    category: Option<&'a str>,
    entries: Vec<&'a E>,
}

/// Splits entries by category, keeping buckets in first-seen order.
///
/// Blank categories are treated as uncategorized.
fn bucket_by_category<E: TimedEntry>(entries: &[E]) -> Vec<Bucket<'_, E>> {
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    let mut buckets: Vec<Bucket<'_, E>> = Vec::new();
    for entry in entries {
        let category = entry.category().filter(|c| !c.is_empty());
        let slot = *index.entry(category).or_insert_with(|| {
            buckets.push(Bucket {
                category,
                entries: Vec::new(),
            });
            buckets.len() - 1
        });
        buckets[slot].entries.push(entry);
    }
    buckets
}

/// Sums durations per task name, sorted by duration descending.
fn totals_by_name<E: TimedEntry>(entries: &[&E], now: DateTime<Utc>) -> Vec<NameTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut items: Vec<NameTotal> = Vec::new();
    for entry in entries {
        let slot = *index.entry(entry.name()).or_insert_with(|| {
            items.push(NameTotal {
                name: entry.name().to_string(),
                count: 0,
                duration_ms: 0,
            });
            items.len() - 1
        });
        items[slot].count += 1;
        items[slot].duration_ms += duration_of(*entry, now);
    }
    items.sort_by_key(|item| Reverse(item.duration_ms));
    items
}

/// Groups entries by category, then by task name.
///
/// Named categories come first, sorted by total duration descending; the
/// uncategorized bucket, if any, is always last.
pub fn group_by_category_then_name<E: TimedEntry>(
    entries: &[E],
    now: DateTime<Utc>,
) -> Vec<CategoryGroup> {
    let mut named = Vec::new();
    let mut uncategorized = None;

    for bucket in bucket_by_category(entries) {
        let items = totals_by_name(&bucket.entries, now);
        let group = CategoryGroup {
            category: bucket.category.map(str::to_string),
            total_duration_ms: items.iter().map(|item| item.duration_ms).sum(),
            entry_count: bucket.entries.len(),
            items,
        };
        if group.is_uncategorized() {
            uncategorized = Some(group);
        } else {
            named.push(group);
        }
    }

    named.sort_by_key(|group| Reverse(group.total_duration_ms));
    named.extend(uncategorized);
    named
}

/// Everything a summary view needs, computed against a single `now`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub groups: Vec<CategoryGroup>,
    /// Union of all intervals; overlapping time counted once.
    pub smart_total_ms: i64,
    /// Sum of individual entry durations.
    pub raw_total_ms: i64,
    pub entry_count: usize,
}

impl Summary {
    pub fn build<E: TimedEntry>(entries: &[E], now: DateTime<Utc>) -> Self {
        Self {
            groups: group_by_category_then_name(entries, now),
            smart_total_ms: merged_duration(entries, now),
            raw_total_ms: raw_total(entries, now),
            entry_count: entries.len(),
        }
    }

    /// True when some entries overlap, so the smart total is below the raw sum.
    pub const fn has_overlap(&self) -> bool {
        self.smart_total_ms != self.raw_total_ms
    }

    pub fn categorized(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.groups.iter().filter(|g| !g.is_uncategorized())
    }

    pub fn uncategorized(&self) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.is_uncategorized())
    }

    pub const fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

/// One "label: rounded (exact)" line of a copyable export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyLine {
    pub label: String,
    pub duration_ms: i64,
    pub rounded_hours: f64,
    pub exact_hours: f64,
}

impl CopyLine {
    fn new(label: impl Into<String>, ms: i64) -> Self {
        Self {
            label: label.into(),
            duration_ms: ms,
            rounded_hours: round_to_quarter_hour(ms),
            exact_hours: ms_to_hours(ms),
        }
    }
}

impl fmt::Display for CopyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, format_rounded_decimal(self.duration_ms))
    }
}

/// Per-category billing lines plus an overlap-aware total, ready to paste
/// into a timesheet system.
///
/// The total line uses the smart total, so it is not the sum of the category
/// lines when entries overlap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickCopy {
    pub lines: Vec<CopyLine>,
    pub total: CopyLine,
}

impl QuickCopy {
    pub fn build<E: TimedEntry>(entries: &[E], now: DateTime<Utc>) -> Self {
        let mut totals: Vec<(Option<&str>, i64)> = bucket_by_category(entries)
            .into_iter()
            .map(|bucket| {
                let ms = bucket.entries.iter().map(|e| duration_of(*e, now)).sum();
                (bucket.category, ms)
            })
            .filter(|(_, ms)| *ms > 0)
            .collect();
        totals.sort_by_key(|(_, ms)| Reverse(*ms));

        let lines = totals
            .into_iter()
            .map(|(category, ms)| CopyLine::new(category.unwrap_or(UNCATEGORIZED_LABEL), ms))
            .collect();

        Self {
            lines,
            total: CopyLine::new("total", merged_duration(entries, now)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for QuickCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "{}", self.total)
    }
}
