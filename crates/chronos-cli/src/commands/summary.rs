//! Summary command: time per category and task with overlap-aware totals.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;
use serde::Serialize;

use chronos_core::duration::ms_to_hours;
use chronos_core::{
    CategoryColor, CategoryGroup, NameTotal, Summary, Timesheet, category_color,
    format_decimal_hours, format_duration, round_to_quarter_hour,
};
use chronos_store::Store;

use super::util::{Clock, plural};

/// Heading used for entries without a category.
const UNCATEGORIZED_HEADING: &str = "uncategorized";

/// JSON summary structure.
#[derive(Debug, Serialize)]
pub struct JsonSummary<'a> {
    pub generated_at: String,
    pub timezone: String,
    pub timesheet: JsonTimesheet<'a>,
    pub totals: JsonTotals,
    pub categories: Vec<JsonCategory<'a>>,
}

#[derive(Debug, Serialize)]
pub struct JsonTimesheet<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JsonTotals {
    /// Overlapping time counted once.
    pub smart_ms: i64,
    /// Plain sum of entry durations.
    pub raw_ms: i64,
    pub smart_hours: f64,
    pub rounded_hours: f64,
    pub has_overlap: bool,
    pub entry_count: usize,
}

#[derive(Debug, Serialize)]
pub struct JsonCategory<'a> {
    /// `null` for uncategorized time.
    pub category: Option<&'a str>,
    pub color: Option<CategoryColor>,
    pub total_ms: i64,
    pub rounded_hours: f64,
    pub entry_count: usize,
    pub items: &'a [NameTotal],
}

impl<'a> JsonCategory<'a> {
    fn from_group(group: &'a CategoryGroup) -> Self {
        Self {
            category: group.category.as_deref(),
            color: group.category.as_deref().and_then(category_color),
            total_ms: group.total_duration_ms,
            rounded_hours: round_to_quarter_hour(group.total_duration_ms),
            entry_count: group.entry_count,
            items: &group.items,
        }
    }
}

fn build_json<'a, Tz>(
    summary: &'a Summary,
    sheet: &'a Timesheet,
    clock: &Clock<Tz>,
    timezone: &str,
) -> JsonSummary<'a>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    JsonSummary {
        generated_at: clock.now().to_rfc3339(),
        timezone: timezone.to_string(),
        timesheet: JsonTimesheet {
            id: sheet.id.as_str(),
            name: &sheet.name,
        },
        totals: JsonTotals {
            smart_ms: summary.smart_total_ms,
            raw_ms: summary.raw_total_ms,
            smart_hours: ms_to_hours(summary.smart_total_ms),
            rounded_hours: round_to_quarter_hour(summary.smart_total_ms),
            has_overlap: summary.has_overlap(),
            entry_count: summary.entry_count,
        },
        categories: summary.groups.iter().map(JsonCategory::from_group).collect(),
    }
}

fn write_group<W: Write>(writer: &mut W, group: &CategoryGroup) -> Result<()> {
    writeln!(
        writer,
        "{}: {} ({}), {}",
        group.category.as_deref().unwrap_or(UNCATEGORIZED_HEADING),
        format_duration(group.total_duration_ms),
        format_decimal_hours(group.total_duration_ms),
        plural(group.entry_count, "entry", "entries"),
    )?;
    for item in &group.items {
        if item.count > 1 {
            writeln!(
                writer,
                "  {} ({}x): {}",
                item.name,
                item.count,
                format_duration(item.duration_ms)
            )?;
        } else {
            writeln!(writer, "  {}: {}", item.name, format_duration(item.duration_ms))?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(writer: &mut W, summary: &Summary, sheet: &Timesheet) -> Result<()> {
    if summary.is_empty() {
        writeln!(writer, "{}: no entries", sheet.name)?;
        return Ok(());
    }

    writeln!(writer, "{}", sheet.name)?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Total: {} ({})",
        format_duration(summary.smart_total_ms),
        format_decimal_hours(summary.smart_total_ms),
    )?;
    if summary.has_overlap() {
        writeln!(
            writer,
            "Overlapping time counted once; entries add up to {} ({})",
            format_duration(summary.raw_total_ms),
            format_decimal_hours(summary.raw_total_ms),
        )?;
    }

    for group in summary.categorized().chain(summary.uncategorized()) {
        writeln!(writer)?;
        write_group(writer, group)?;
    }
    Ok(())
}

pub fn run<W, Tz>(
    writer: &mut W,
    store: &Store,
    sheet: &Timesheet,
    json: bool,
    clock: &Clock<Tz>,
    timezone: &str,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let entries = store.list_entries(&sheet.id);
    let summary = Summary::build(&entries, clock.now());
    tracing::debug!(
        entries = summary.entry_count,
        smart_ms = summary.smart_total_ms,
        raw_ms = summary.raw_total_ms,
        "built summary"
    );

    if json {
        let report = build_json(&summary, sheet, clock, timezone);
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_text(writer, &summary, sheet)?;
    }
    Ok(())
}
