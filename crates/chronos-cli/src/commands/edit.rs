//! Edit command for changing an existing entry.

use std::fmt;
use std::io::Write;

use anyhow::{Result, bail};
use chrono::TimeZone;
use clap::Args;

use chronos_core::{duration_of, format_duration};
use chronos_store::{EntryUpdate, Store};

use super::util::{Clock, SHORT_ID_LEN};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Entry ID or unique prefix.
    pub id: String,

    /// New task name.
    #[arg(long)]
    pub name: Option<String>,

    /// New category.
    #[arg(short = 'k', long, conflicts_with = "clear_category")]
    pub category: Option<String>,

    /// Remove the category.
    #[arg(long)]
    pub clear_category: bool,

    /// New start time (HH:MM, RFC 3339 or "20 minutes ago").
    #[arg(long)]
    pub start: Option<String>,

    /// New end time.
    #[arg(long, conflicts_with = "running")]
    pub end: Option<String>,

    /// Clear the end time so the entry is running again.
    #[arg(long)]
    pub running: bool,
}

impl EditArgs {
    fn to_update<Tz>(&self, clock: &Clock<Tz>) -> Result<EntryUpdate>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let category = if self.clear_category {
            Some(None)
        } else {
            self.category.clone().map(Some)
        };
        let end_time = if self.running {
            Some(None)
        } else {
            self.end
                .as_deref()
                .map(|s| clock.parse_time(s))
                .transpose()?
                .map(Some)
        };
        Ok(EntryUpdate {
            name: self.name.clone(),
            category,
            start_time: self.start.as_deref().map(|s| clock.parse_time(s)).transpose()?,
            end_time,
        })
    }
}

pub fn run<W, Tz>(writer: &mut W, store: &mut Store, args: &EditArgs, clock: &Clock<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let update = args.to_update(clock)?;
    if update.is_empty() {
        bail!("nothing to change; pass --name, --category, --start, --end or --running");
    }

    let id = store.resolve_entry_id(&args.id)?;
    let current = store.get_entry(&id)?;
    let start = update.start_time.unwrap_or(current.start_time);
    let end = update.end_time.unwrap_or(current.end_time);
    if end.is_some_and(|end| end < start) {
        bail!("end time is before start time");
    }

    let entry = store.update_entry(&id, update)?;
    let label = entry
        .category
        .as_ref()
        .map_or_else(String::new, |c| format!(" [{c}]"));
    writeln!(
        writer,
        "Updated {}{label} {} - {}, {} ({})",
        entry.name,
        clock.clock_time(Some(entry.start_time)),
        if entry.is_running() {
            "running".to_string()
        } else {
            clock.clock_time(entry.end_time)
        },
        format_duration(duration_of(&entry, clock.now())),
        entry.id.short(SHORT_ID_LEN),
    )?;
    Ok(())
}
