//! Copy command: quarter-hour rounded lines for pasting into a billing system.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use chronos_core::{QuickCopy, Timesheet};
use chronos_store::Store;

pub fn run<W: Write>(
    writer: &mut W,
    store: &Store,
    sheet: &Timesheet,
    now: DateTime<Utc>,
) -> Result<()> {
    let entries = store.list_entries(&sheet.id);
    let export = QuickCopy::build(&entries, now);
    if export.is_empty() {
        writeln!(writer, "No time logged in {}", sheet.name)?;
        return Ok(());
    }
    writeln!(writer, "{export}")?;
    Ok(())
}
