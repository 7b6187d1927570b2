//! Timesheet management commands.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;

use chronos_core::{Timesheet, format_duration, merged_duration};
use chronos_store::Store;

use super::util::{Clock, SHORT_ID_LEN, plural};

/// Lists timesheets newest first, marking the one commands currently use.
pub fn list<W, Tz>(
    writer: &mut W,
    store: &Store,
    active: Option<&Timesheet>,
    clock: &Clock<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let sheets = store.list_timesheets();
    if sheets.is_empty() {
        writeln!(writer, "No timesheets yet. Create one with: chronos sheets new [name]")?;
        return Ok(());
    }

    for sheet in &sheets {
        let entries = store.list_entries(&sheet.id);
        let marker = if active.is_some_and(|a| a.id == sheet.id) {
            '*'
        } else {
            ' '
        };
        writeln!(
            writer,
            "{marker} {}  {}  ({}, {}, created {})",
            sheet.id.short(SHORT_ID_LEN),
            sheet.name,
            plural(entries.len(), "entry", "entries"),
            format_duration(merged_duration(&entries, clock.now())),
            clock.date_of(sheet.created_at),
        )?;
    }
    Ok(())
}

/// Creates a timesheet; without a name it is named after today's date.
pub fn create<W, Tz>(
    writer: &mut W,
    store: &mut Store,
    name: Option<&str>,
    clock: &Clock<Tz>,
) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let sheet = store.create_timesheet(name, clock.now())?;
    writeln!(
        writer,
        "Created timesheet {} ({})",
        sheet.name,
        sheet.id.short(SHORT_ID_LEN)
    )?;
    Ok(())
}

pub fn rename<W: Write>(writer: &mut W, store: &mut Store, id: &str, name: &str) -> Result<()> {
    let id = store.resolve_timesheet_id(id)?;
    let old = store.get_timesheet(&id)?;
    let sheet = store.rename_timesheet(&id, name)?;
    writeln!(writer, "Renamed {} to {}", old.name, sheet.name)?;
    Ok(())
}

/// Deletes a timesheet together with its entries.
pub fn delete<W: Write>(writer: &mut W, store: &mut Store, id: &str) -> Result<()> {
    let id = store.resolve_timesheet_id(id)?;
    let sheet = store.get_timesheet(&id)?;
    let removed = store.delete_timesheet(&id)?;
    writeln!(
        writer,
        "Deleted timesheet {} and {}",
        sheet.name,
        plural(removed, "entry", "entries")
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::commands::util::test_support::{add_entry, at, clock, redact_ids};

    #[test]
    fn list_marks_active_sheet() {
        let mut store = Store::in_memory();
        let monday = store.create_timesheet(Some("Monday"), at(7, 0)).unwrap();
        let tuesday = store.create_timesheet(Some("Tuesday"), at(8, 0)).unwrap();
        add_entry(&mut store, &monday.id, "code", None, at(9, 0), Some(at(10, 0)));
        add_entry(&mut store, &monday.id, "tests", None, at(9, 30), Some(at(10, 30)));

        let mut output = Vec::new();
        list(&mut output, &store, Some(&tuesday), &clock()).unwrap();
        let output = redact_ids(&String::from_utf8(output).unwrap(), &store);

        assert_snapshot!(output, @r"
        * [id]  Tuesday  (0 entries, 0s, created 2025-03-04)
          [id]  Monday  (2 entries, 1h 30m, created 2025-03-04)
        ");
    }

    #[test]
    fn list_without_sheets() {
        let store = Store::in_memory();
        let mut output = Vec::new();
        list(&mut output, &store, None, &clock()).unwrap();
        assert!(String::from_utf8(output).unwrap().starts_with("No timesheets yet"));
    }

    #[test]
    fn create_named_sheet() {
        let mut store = Store::in_memory();
        let mut output = Vec::new();
        create(&mut output, &mut store, Some("Client A"), &clock()).unwrap();
        let output = redact_ids(&String::from_utf8(output).unwrap(), &store);

        assert_snapshot!(output, @"Created timesheet Client A ([id])");
        assert_eq!(store.list_timesheets().len(), 1);
    }

    #[test]
    fn rename_by_prefix() {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Draft"), at(8, 0)).unwrap();

        let mut output = Vec::new();
        rename(&mut output, &mut store, sheet.id.short(6), "Final").unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Renamed Draft to Final");
        assert_eq!(store.get_timesheet(&sheet.id).unwrap().name, "Final");
    }

    #[test]
    fn rename_rejects_blank_name() {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Draft"), at(8, 0)).unwrap();
        let mut output = Vec::new();
        let err = rename(&mut output, &mut store, sheet.id.as_str(), "  ").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn delete_cascades_to_entries() {
        let mut store = Store::in_memory();
        let doomed = store.create_timesheet(Some("Old"), at(7, 0)).unwrap();
        let kept = store.create_timesheet(Some("Current"), at(8, 0)).unwrap();
        add_entry(&mut store, &doomed.id, "a", None, at(9, 0), Some(at(10, 0)));
        add_entry(&mut store, &doomed.id, "b", None, at(10, 0), Some(at(11, 0)));
        add_entry(&mut store, &kept.id, "c", None, at(9, 0), None);

        let mut output = Vec::new();
        delete(&mut output, &mut store, doomed.id.as_str()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @"Deleted timesheet Old and 2 entries");
        assert_eq!(store.list_timesheets().len(), 1);
        assert_eq!(store.document().entries.len(), 1);
    }
}
