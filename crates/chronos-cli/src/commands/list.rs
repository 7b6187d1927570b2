//! List command: the entries of one timesheet.

use std::fmt;
use std::io::Write;

use anyhow::Result;
use chrono::TimeZone;

use chronos_core::{
    Entry, Timesheet, duration_of, format_decimal_hours, format_duration, merged_duration,
    raw_total,
};
use chronos_store::Store;

use super::util::{Clock, SHORT_ID_LEN, plural};

fn write_entry<W, Tz>(writer: &mut W, entry: &Entry, clock: &Clock<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let marker = if entry.is_running() { '*' } else { ' ' };
    let end = if entry.is_running() {
        "running".to_string()
    } else {
        clock.clock_time(entry.end_time)
    };
    let label = entry
        .category
        .as_ref()
        .map_or_else(String::new, |c| format!(" [{c}]"));
    writeln!(
        writer,
        "{marker} {}  {:>8} - {end:<8}  {:>7}  {}{label}",
        entry.id.short(SHORT_ID_LEN),
        clock.clock_time(Some(entry.start_time)),
        format_duration(duration_of(entry, clock.now())),
        entry.name,
    )?;
    Ok(())
}

pub fn run<W, Tz>(writer: &mut W, store: &Store, sheet: &Timesheet, clock: &Clock<Tz>) -> Result<()>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let entries = store.list_entries(&sheet.id);
    if entries.is_empty() {
        writeln!(writer, "{}: no entries", sheet.name)?;
        writeln!(writer, "Start one with: chronos start <name>")?;
        return Ok(());
    }

    writeln!(
        writer,
        "{}: {}",
        sheet.name,
        plural(entries.len(), "entry", "entries")
    )?;
    writeln!(writer)?;
    for entry in &entries {
        write_entry(writer, entry, clock)?;
    }

    let smart = merged_duration(&entries, clock.now());
    let raw = raw_total(&entries, clock.now());
    writeln!(writer)?;
    write!(
        writer,
        "Total: {} ({})",
        format_duration(smart),
        format_decimal_hours(smart)
    )?;
    if raw != smart {
        write!(writer, "; {} before merging overlaps", format_duration(raw))?;
    }
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    use crate::commands::util::test_support::{add_entry, at, clock, redact_ids};

    #[test]
    fn list_shows_running_first_then_newest() {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Tuesday"), at(8, 0)).unwrap();
        add_entry(&mut store, &sheet.id, "code", Some("dev"), at(10, 0), Some(at(11, 0)));
        add_entry(&mut store, &sheet.id, "review", Some("dev"), at(10, 30), Some(at(10, 45)));
        add_entry(&mut store, &sheet.id, "email", None, at(11, 30), None);

        let mut output = Vec::new();
        run(&mut output, &store, &sheet, &clock()).unwrap();
        let output = redact_ids(&String::from_utf8(output).unwrap(), &store);

        assert_snapshot!(output, @r"
        Tuesday: 3 entries

        * [id]  11:30 AM - running   30m 00s  email
          [id]  10:30 AM - 10:45 AM  15m 00s  review [dev]
          [id]  10:00 AM - 11:00 AM   1h 00m  code [dev]

        Total: 1h 30m (1.5h); 1h 45m before merging overlaps
        ");
    }

    #[test]
    fn list_without_overlap_has_single_total() {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Tuesday"), at(8, 0)).unwrap();
        add_entry(&mut store, &sheet.id, "code", None, at(9, 0), Some(at(9, 45)));

        let mut output = Vec::new();
        run(&mut output, &store, &sheet, &clock()).unwrap();
        let output = redact_ids(&String::from_utf8(output).unwrap(), &store);

        assert_snapshot!(output, @r"
        Tuesday: 1 entry

          [id]   9:00 AM - 9:45 AM   45m 00s  code

        Total: 45m 00s (0.8h)
        ");
    }

    #[test]
    fn list_empty_sheet() {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Tuesday"), at(8, 0)).unwrap();

        let mut output = Vec::new();
        run(&mut output, &store, &sheet, &clock()).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        Tuesday: no entries
        Start one with: chronos start <name>
        ");
    }

    #[test]
    fn list_ignores_other_sheets() {
        let mut store = Store::in_memory();
        let sheet = store.create_timesheet(Some("Tuesday"), at(8, 0)).unwrap();
        let other = store.create_timesheet(Some("Other"), at(8, 0)).unwrap();
        add_entry(&mut store, &other.id, "elsewhere", None, at(9, 0), Some(at(10, 0)));

        let mut output = Vec::new();
        run(&mut output, &store, &sheet, &clock()).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("no entries"));
    }
}
