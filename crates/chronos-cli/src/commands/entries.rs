//! Stop, restart and remove commands for single entries.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;

use chronos_core::{Entry, Timesheet, duration_of, format_duration};
use chronos_store::Store;

use super::util::{Clock, SHORT_ID_LEN};

/// Stops the given entry, or every running entry in the sheet.
pub fn stop<W, Tz>(
    writer: &mut W,
    store: &mut Store,
    sheet: &Timesheet,
    id: Option<&str>,
    clock: &Clock<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let ids = match id {
        Some(prefix) => vec![store.resolve_entry_id(prefix)?],
        None => store
            .list_entries(&sheet.id)
            .into_iter()
            .filter(Entry::is_running)
            .map(|e| e.id)
            .collect(),
    };
    if ids.is_empty() {
        writeln!(writer, "Nothing is running")?;
        return Ok(());
    }

    for id in &ids {
        let entry = store.stop_entry(id, clock.now())?;
        writeln!(
            writer,
            "Stopped {} at {}, {} ({})",
            entry.name,
            clock.clock_time(entry.end_time),
            format_duration(duration_of(&entry, clock.now())),
            entry.id.short(SHORT_ID_LEN),
        )?;
    }
    Ok(())
}

/// Starts a fresh running copy of an entry.
pub fn restart<W, Tz>(writer: &mut W, store: &mut Store, id: &str, clock: &Clock<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let id = store.resolve_entry_id(id)?;
    let entry = store.restart_entry(&id, clock.now())?;
    writeln!(
        writer,
        "Restarted {} at {} ({})",
        entry.name,
        clock.clock_time(Some(entry.start_time)),
        entry.id.short(SHORT_ID_LEN),
    )?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, store: &mut Store, id: &str) -> Result<()> {
    let id = store.resolve_entry_id(id)?;
    let entry = store.get_entry(&id)?;
    store.delete_entry(&id)?;
    writeln!(writer, "Deleted {} ({})", entry.name, entry.id.short(SHORT_ID_LEN))?;
    Ok(())
}
