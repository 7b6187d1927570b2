//! Start command: begins a running entry or logs a finished one.

use std::fmt;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::TimeZone;
use clap::Args;

use chronos_core::{EntryTimes, Timesheet, duration_of, format_duration};
use chronos_store::{NewEntry, Store};

use super::util::{Clock, SHORT_ID_LEN, parse_duration_arg};

#[derive(Debug, Args)]
pub struct StartArgs {
    /// What you are working on.
    pub name: String,

    /// Category to file the time under.
    #[arg(short = 'k', long)]
    pub category: Option<String>,

    /// When the work started (HH:MM, RFC 3339 or "20 minutes ago").
    #[arg(long)]
    pub start: Option<String>,

    /// When the work ended; logs a completed entry.
    #[arg(long)]
    pub end: Option<String>,

    /// How long the work took ("1h30m", "45m", "90").
    ///
    /// With --start this logs a completed entry; on its own it backdates a
    /// running entry.
    #[arg(short, long)]
    pub duration: Option<String>,
}

pub fn run<W, Tz>(
    writer: &mut W,
    store: &mut Store,
    sheet: &Timesheet,
    args: &StartArgs,
    clock: &Clock<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let start = args.start.as_deref().map(|s| clock.parse_time(s)).transpose()?;
    let end = args.end.as_deref().map(|s| clock.parse_time(s)).transpose()?;
    let duration_ms = args.duration.as_deref().map(parse_duration_arg).transpose()?;

    let Some(times) = EntryTimes::resolve(start, end, duration_ms, clock.now()) else {
        bail!("duration is too long");
    };
    if times.end.is_some_and(|end| end < times.start) {
        bail!("end time is before start time");
    }

    let entry = store.create_entry(
        NewEntry {
            timesheet_id: sheet.id.clone(),
            name: args.name.clone(),
            category: args.category.clone(),
            start_time: Some(times.start),
            end_time: times.end,
        },
        clock.now(),
    )?;

    let label = entry
        .category
        .as_ref()
        .map_or_else(String::new, |c| format!(" [{c}]"));
    let id = entry.id.short(SHORT_ID_LEN);
    if entry.is_running() {
        writeln!(
            writer,
            "Started {}{label} at {} ({id})",
            entry.name,
            clock.clock_time(Some(entry.start_time)),
        )?;
    } else {
        writeln!(
            writer,
            "Logged {}{label} {} - {}, {} ({id})",
            entry.name,
            clock.clock_time(Some(entry.start_time)),
            clock.clock_time(entry.end_time),
            format_duration(duration_of(&entry, clock.now())),
        )?;
    }
    Ok(())
}
