//! Pure time arithmetic for the credential validity window.

use std::fmt;

use gatechat_platform::clock::MILLIS_PER_HOUR;

/// Time left before a credential expires, floored to whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RemainingTime {
    pub hours: u32,
    pub minutes: u32,
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Fractional hours between `issued_at_ms` and `now_ms`.
///
/// `None` when the difference does not fit in an `i64`; such a timestamp
/// cannot have come from a real save.
pub fn hours_elapsed(issued_at_ms: i64, now_ms: i64) -> Option<f64> {
    let elapsed_ms = now_ms.checked_sub(issued_at_ms)?;
    Some(elapsed_ms as f64 / MILLIS_PER_HOUR as f64)
}

/// Remaining part of a `window_hours` window opened at `issued_at_ms`, or
/// `None` once nothing is left.
pub fn remaining_validity(
    issued_at_ms: i64,
    now_ms: i64,
    window_hours: u32,
) -> Option<RemainingTime> {
    let remaining = f64::from(window_hours) - hours_elapsed(issued_at_ms, now_ms)?;
    if remaining <= 0.0 {
        return None;
    }
    let hours = remaining.floor();
    let minutes = ((remaining - hours) * 60.0).floor();
    Some(RemainingTime {
        hours: hours as u32,
        minutes: minutes as u32,
    })
}
