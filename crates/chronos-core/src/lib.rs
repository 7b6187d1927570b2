//! Core domain logic for the chronos time tracker.
//!
//! This crate contains the record types and the duration accounting engine:
//! - Duration: parsing typed durations and formatting them for display
//! - Interval: per-entry elapsed time against an explicit `now`
//! - Merge: overlap-free totals across entries
//! - Rounding: quarter-hour billing rounding
//! - Report: category/name grouping, smart vs raw totals, copyable exports
//!
//! Nothing here reads the clock or touches storage; callers sample `now`
//! once and pass it in, so a whole report is computed against one instant.

pub mod color;
pub mod duration;
mod interval;
mod merge;
pub mod report;
mod rounding;
pub mod timing;
pub mod types;

pub use color::{CategoryColor, category_color};
pub use duration::{
    format_clock_time, format_decimal_hours, format_duration, format_rounded_decimal, parse_duration, to_fixed,
};
pub use interval::{Interval, TimedEntry, duration_of};
pub use merge::{merged_duration, raw_total};
pub use report::{CategoryGroup, CopyLine, NameTotal, QuickCopy, Summary, group_by_category_then_name};
pub use rounding::round_to_quarter_hour;
pub use timing::{EntryTimes, parse_clock_time};
pub use types::{Entry, EntryId, Timesheet, TimesheetId, ValidationError};
