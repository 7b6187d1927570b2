//! Duration parsing and formatting.
//!
//! All durations are milliseconds as `i64`. Parsing accepts the free-text
//! forms people type into a duration field ("1h30m", "1h 30m", "1.5h",
//! "45m", "90"); formatting produces the compact display strings used in
//! listings and summaries.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;

use crate::rounding::round_to_quarter_hour;

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?|\.\d+)\s*h").unwrap());

// No lookahead in `regex`, so "not followed by s" is spelled as an explicit
// trailing class or end of input.
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?|\.\d+)\s*m(?:[^s]|$)").unwrap());

static SECONDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?|\.\d+)\s*s").unwrap());

/// Returns the first numeric capture of `re` in `text`, if any.
fn component(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parses a human-entered duration into milliseconds.
///
/// Hour, minute and second components may appear in any subset, with or
/// without whitespace between them. When no unit is present the whole input
/// is read as a number of minutes. Returns `None` for blank input, input with
/// no usable number, or a total that is not strictly positive.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_duration(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let hours = component(&HOURS_RE, trimmed);
    let minutes = component(&MINUTES_RE, trimmed);
    let seconds = component(&SECONDS_RE, trimmed);

    let total_ms = if hours.is_none() && minutes.is_none() && seconds.is_none() {
        let bare_minutes = trimmed.parse::<f64>().ok()?;
        bare_minutes * MS_PER_MINUTE as f64
    } else {
        hours.unwrap_or(0.0) * MS_PER_HOUR as f64
            + minutes.unwrap_or(0.0) * MS_PER_MINUTE as f64
            + seconds.unwrap_or(0.0) * MS_PER_SECOND as f64
    };

    if !total_ms.is_finite() || total_ms <= 0.0 || total_ms >= i64::MAX as f64 {
        return None;
    }
    let ms = total_ms.round() as i64;
    (ms > 0).then_some(ms)
}

/// Formats milliseconds as a compact duration.
///
/// Exactly one precision is used: "1h 05m" at an hour or more, "4m 09s" at a
/// minute or more, otherwise "12s". Negative input renders as "0s".
pub fn format_duration(ms: i64) -> String {
    let total_seconds = ms.max(0) / MS_PER_SECOND;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

/// Converts milliseconds to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_hours(ms: i64) -> f64 {
    ms as f64 / MS_PER_HOUR as f64
}

/// Formats `value` with `digits` decimals, rounding ties away from zero.
///
/// `format!("{:.1}", 1.25)` rounds half to even and prints "1.2"; billing
/// figures expect "1.3".
pub fn to_fixed(value: f64, digits: u8) -> String {
    let factor = 10_f64.powi(i32::from(digits));
    let rounded = (value * factor).round() / factor;
    format!("{rounded:.prec$}", prec = usize::from(digits))
}

/// Formats milliseconds as decimal hours with one decimal place ("1.5h").
///
/// Anything under a tenth of an hour shows as "0.0h".
pub fn format_decimal_hours(ms: i64) -> String {
    let hours = ms_to_hours(ms);
    if hours < 0.1 {
        return "0.0h".to_string();
    }
    format!("{}h", to_fixed(hours, 1))
}

/// Formats milliseconds as "rounded (exact)" decimal hours, e.g. "1.25 (1.23)".
pub fn format_rounded_decimal(ms: i64) -> String {
    if ms <= 0 {
        return "0.00".to_string();
    }
    let exact = ms_to_hours(ms);
    let rounded = round_to_quarter_hour(ms);
    format!("{} ({})", to_fixed(rounded, 2), to_fixed(exact, 2))
}

/// Formats a timestamp as a short 12-hour wall-clock time ("8:30 AM").
pub fn format_clock_time<Tz>(timestamp: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.map_or_else(
        || "—".to_string(),
        |ts| ts.with_timezone(tz).format("%-I:%M %p").to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn parses_hours_and_minutes_with_space() {
        assert_eq!(parse_duration("1h 30m"), Some(90 * MS_PER_MINUTE));
    }

    #[test]
    fn parses_compact_and_fractional_forms() {
        assert_eq!(parse_duration("1h30m"), Some(90 * MS_PER_MINUTE));
        assert_eq!(parse_duration("1.5h"), Some(90 * MS_PER_MINUTE));
        assert_eq!(parse_duration("45m"), Some(45 * MS_PER_MINUTE));
        assert_eq!(parse_duration("30s"), Some(30 * MS_PER_SECOND));
        assert_eq!(
            parse_duration("2h 5m 10s"),
            Some(2 * MS_PER_HOUR + 5 * MS_PER_MINUTE + 10 * MS_PER_SECOND)
        );
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(parse_duration("1H 30M"), Some(90 * MS_PER_MINUTE));
        assert_eq!(parse_duration("20S"), Some(20 * MS_PER_SECOND));
    }

    #[test]
    fn minutes_followed_by_s_is_not_a_minute_component() {
        // "ms" is neither minutes nor seconds, so only the hour counts.
        assert_eq!(parse_duration("1h 30ms"), Some(MS_PER_HOUR));
        // Longer spellings still count as minutes.
        assert_eq!(parse_duration("15 min"), Some(15 * MS_PER_MINUTE));
    }

    #[test]
    fn bare_number_is_minutes() {
        assert_eq!(parse_duration("90"), Some(90 * MS_PER_MINUTE));
        assert_eq!(parse_duration(" 2.5 "), Some(150 * MS_PER_SECOND));
    }

    #[test]
    fn rejects_blank_garbage_and_non_positive() {
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("   "), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("0h 0m"), None);
        assert_eq!(parse_duration("-5"), None);
    }

    #[test]
    fn format_boundaries() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59_000), "59s");
        assert_eq!(format_duration(60_000), "1m 00s");
        assert_eq!(format_duration(3_600_000), "1h 00m");
    }

    #[test]
    fn format_truncates_and_pads() {
        assert_eq!(format_duration(59_999), "59s");
        assert_eq!(format_duration(9 * MS_PER_MINUTE + 5_000), "9m 05s");
        assert_eq!(format_duration(MS_PER_HOUR + 5 * MS_PER_MINUTE + 59_000), "1h 05m");
        assert_eq!(format_duration(26 * MS_PER_HOUR), "26h 00m");
    }

    #[test]
    fn format_clamps_negative() {
        assert_eq!(format_duration(-5_000), "0s");
    }

    #[test]
    fn decimal_hours() {
        assert_eq!(format_decimal_hours(0), "0.0h");
        assert_eq!(format_decimal_hours(5 * MS_PER_MINUTE), "0.0h");
        assert_eq!(format_decimal_hours(6 * MS_PER_MINUTE), "0.1h");
        assert_eq!(format_decimal_hours(90 * MS_PER_MINUTE), "1.5h");
        assert_eq!(format_decimal_hours(-MS_PER_HOUR), "0.0h");
    }

    #[test]
    fn decimal_ties_round_up() {
        assert_eq!(format_decimal_hours(75 * MS_PER_MINUTE), "1.3h");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(2.0, 2), "2.00");
    }

    #[test]
    fn rounded_decimal_shows_both_values() {
        assert_eq!(format_rounded_decimal(0), "0.00");
        assert_eq!(format_rounded_decimal(90 * MS_PER_MINUTE), "1.50 (1.50)");
        assert_eq!(format_rounded_decimal(3 * MS_PER_MINUTE), "0.25 (0.05)");
    }

    #[test]
    fn clock_time_uses_given_zone() {
        let ts = DateTime::parse_from_rfc3339("2025-03-04T13:05:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_clock_time(Some(ts), &Utc), "1:05 PM");

        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(format_clock_time(Some(ts), &minus_five), "8:05 AM");
        assert_eq!(format_clock_time(None, &Utc), "—");
    }
}
