//! Shared utilities for CLI commands.

use std::fmt;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use regex::Regex;

use chronos_core::{Timesheet, format_clock_time, parse_clock_time, parse_duration};
use chronos_store::Store;

/// Characters of an ID shown in listings; any unique prefix is accepted back.
pub const SHORT_ID_LEN: usize = 8;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(minute|min|m|hour|h)s?\s+ago$").unwrap());

/// Relative inputs further back than a week are almost certainly typos.
const MAX_RELATIVE_MINUTES: i64 = 7 * 24 * 60;

/// The instant and time zone a command runs against.
///
/// `now` is sampled once per invocation, so every duration in one command's
/// output is measured against the same instant.
#[derive(Debug, Clone)]
pub struct Clock<Tz: TimeZone> {
    now: DateTime<Utc>,
    tz: Tz,
}

impl<Tz> Clock<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub const fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz }
    }

    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The local calendar date of `now`.
    pub fn today(&self) -> NaiveDate {
        self.date_of(self.now)
    }

    /// The local calendar date of `timestamp`.
    pub fn date_of(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.tz).date_naive()
    }

    /// Formats a timestamp as local wall-clock time.
    pub fn clock_time(&self, timestamp: Option<DateTime<Utc>>) -> String {
        format_clock_time(timestamp, &self.tz)
    }

    /// Parses a time given on the command line.
    ///
    /// Supports:
    /// - Wall clock today: "09:30", "17:05"
    /// - RFC 3339: "2026-01-15T10:30:00Z"
    /// - Relative: "20 minutes ago", "2h ago"
    pub fn parse_time(&self, text: &str) -> Result<DateTime<Utc>> {
        let text = text.trim();
        if let Some(ts) = parse_clock_time(text, self.today(), &self.tz) {
            return Ok(ts);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
            return Ok(ts.with_timezone(&Utc));
        }

        let Some(caps) = RELATIVE_TIME_RE.captures(text) else {
            bail!(
                "invalid time: {text}. Use HH:MM (e.g. 09:30), RFC 3339 or relative (e.g. '20 minutes ago')"
            );
        };
        let n: i64 = caps[1]
            .parse()
            .context("failed to parse number in relative time")?;
        let minutes_per_unit = match &caps[2] {
            "minute" | "min" | "m" => 1,
            _ => 60,
        };
        let minutes = n.saturating_mul(minutes_per_unit);
        if minutes > MAX_RELATIVE_MINUTES {
            bail!("relative time too far back: {text}");
        }
        Ok(self.now - Duration::minutes(minutes))
    }
}

/// Parses a duration flag, turning `None` into a user-facing error.
pub fn parse_duration_arg(text: &str) -> Result<i64> {
    parse_duration(text).with_context(|| {
        format!("invalid duration: {text}. Try e.g. 1h30m, 45m, 1.5h or 90 (minutes)")
    })
}

/// Picks the timesheet a command works on: the one named by `--sheet`, or
/// the newest (created on first use).
pub fn resolve_sheet(store: &mut Store, sheet: Option<&str>, now: DateTime<Utc>) -> Result<Timesheet> {
    match sheet {
        Some(prefix) => {
            let id = store.resolve_timesheet_id(prefix)?;
            Ok(store.get_timesheet(&id)?)
        }
        None => Ok(store.ensure_timesheet(now)?),
    }
}

/// Returns `"1 entry"`, `"3 entries"`.
pub fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};
    use chronos_core::{Entry, TimesheetId};
    use chronos_store::{NewEntry, Store};

    use super::{Clock, SHORT_ID_LEN};

    /// 2025-03-04 12:00 UTC, a Tuesday.
    pub fn noon() -> DateTime<Utc> {
        at(12, 0)
    }

    pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 4, hour, minute, 0).unwrap()
    }

    pub fn clock() -> Clock<Utc> {
        Clock::new(noon(), Utc)
    }

    pub fn add_entry(
        store: &mut Store,
        sheet: &TimesheetId,
        name: &str,
        category: Option<&str>,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    ) -> Entry {
        store
            .create_entry(
                NewEntry {
                    timesheet_id: sheet.clone(),
                    name: name.to_string(),
                    category: category.map(str::to_string),
                    start_time: Some(start),
                    end_time: end,
                },
                noon(),
            )
            .unwrap()
    }

    /// Replaces random entry and timesheet IDs in rendered output with `[id]`.
    pub fn redact_ids(output: &str, store: &Store) -> String {
        let doc = store.document();
        let entry_ids = doc.entries.iter().map(|e| e.id.short(SHORT_ID_LEN));
        let sheet_ids = doc.timesheets.iter().map(|t| t.id.short(SHORT_ID_LEN));
        entry_ids
            .chain(sheet_ids)
            .fold(output.to_string(), |text, id| text.replace(id, "[id]"))
    }
}
