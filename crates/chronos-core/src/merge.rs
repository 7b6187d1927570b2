//! Overlap-aware totals.
//!
//! Two entries running at the same time (say, a meeting logged while a coding
//! timer was left on) must not count that stretch twice. [`merged_duration`]
//! computes the union of all entry intervals; [`raw_total`] is the naive sum
//! that per-task listings show. The two are equal exactly when no intervals
//! overlap.

use chrono::{DateTime, Utc};

use crate::interval::{Interval, TimedEntry, duration_of};

/// Total time covered by the entries, counting overlapping stretches once.
///
/// Intervals that touch (one ends exactly when the next starts) merge.
/// Intervals whose end precedes their start contribute nothing.
pub fn merged_duration<E: TimedEntry>(entries: &[E], now: DateTime<Utc>) -> i64 {
    let mut intervals: Vec<Interval> = entries
        .iter()
        .map(|e| Interval::of(e, now))
        .filter(|i| i.end >= i.start)
        .collect();
    if intervals.is_empty() {
        return 0;
    }
    intervals.sort_by_key(|i| i.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged.iter().map(Interval::duration_ms).sum()
}

/// Naive sum of every entry's duration. Overlaps are counted once per entry.
pub fn raw_total<E: TimedEntry>(entries: &[E], now: DateTime<Utc>) -> i64 {
    entries.iter().map(|e| duration_of(e, now)).sum()
}
