//! Billing-increment rounding.

use crate::duration::ms_to_hours;

/// Rounds a duration to the nearest quarter hour, returned as decimal hours.
///
/// Non-positive durations yield 0. Any positive duration yields at least
/// 0.25: time that was tracked is never billed as zero.
pub fn round_to_quarter_hour(ms: i64) -> f64 {
    if ms <= 0 {
        return 0.0;
    }
    let rounded = (ms_to_hours(ms) * 4.0).round() / 4.0;
    if rounded > 0.0 { rounded } else { 0.25 }
}
