//! Turning user-supplied time inputs into entry start and end times.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

/// Parses a 24-hour `HH:MM` wall-clock time on `date` in `tz`.
///
/// Times that fall in a DST gap return `None`; ambiguous times (DST
/// fall-back) resolve to the earlier instant.
pub fn parse_clock_time<Tz: TimeZone>(text: &str, date: NaiveDate, tz: &Tz) -> Option<DateTime<Utc>> {
    let time = NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()?;
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => Some(dt.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Resolved start and end for a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTimes {
    pub start: DateTime<Utc>,
    /// `None` means the entry starts out running.
    pub end: Option<DateTime<Utc>>,
}

impl EntryTimes {
    /// Combines optional start, end and duration inputs.
    ///
    /// - start + end: completed entry
    /// - start + duration: completed entry ending `duration` after start
    /// - duration only: running entry that started `duration` ago
    /// - start only: running entry from `start`
    /// - nothing: running entry from `now`
    ///
    /// An explicit end wins over a duration. With an end but no start, the
    /// entry starts at `now`. Returns `None` when the duration moves a
    /// timestamp outside the representable range.
    pub fn resolve(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        duration_ms: Option<i64>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let times = match (start, end, duration_ms) {
            (start, Some(end), _) => Self {
                start: start.unwrap_or(now),
                end: Some(end),
            },
            (Some(start), None, Some(ms)) => Self {
                start,
                end: Some(start.checked_add_signed(Duration::try_milliseconds(ms)?)?),
            },
            (None, None, Some(ms)) => Self {
                start: now.checked_sub_signed(Duration::try_milliseconds(ms)?)?,
                end: None,
            },
            (start, None, None) => Self {
                start: start.unwrap_or(now),
                end: None,
            },
        };
        Some(times)
    }

    pub const fn is_running(&self) -> bool {
        self.end.is_none()
    }
}
