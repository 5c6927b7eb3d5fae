//! Deadline arithmetic and presentation helpers.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// A deadline closer than this is "approaching".
pub const DEADLINE_SOON_WINDOW_SECS: u64 = 3 * SECONDS_PER_DAY;

/// Returns the clock's current time in unix seconds, clamped at zero.
#[must_use]
pub fn unix_now(clock: &impl Clock) -> u64 {
    u64::try_from(clock.utc().timestamp()).unwrap_or(0)
}

/// Returns the deadline `days` from now, or `None` on overflow.
#[must_use]
pub fn deadline_after_days(clock: &impl Clock, days: u64) -> Option<u64> {
    days.checked_mul(SECONDS_PER_DAY)
        .and_then(|offset| unix_now(clock).checked_add(offset))
}

/// Returns `true` once the current time is strictly past `deadline`.
#[must_use]
pub fn is_deadline_passed(deadline: u64, clock: &impl Clock) -> bool {
    unix_now(clock) > deadline
}

/// Returns `true` when `deadline` is in the future but within
/// [`DEADLINE_SOON_WINDOW_SECS`].
#[must_use]
pub fn is_deadline_soon(deadline: u64, clock: &impl Clock) -> bool {
    deadline
        .checked_sub(unix_now(clock))
        .is_some_and(|left| left > 0 && left < DEADLINE_SOON_WINDOW_SECS)
}

/// Renders `deadline` as a date in the local time zone.
///
/// Presentation only: the output depends on the host time zone. Deadlines
/// outside chrono's range fall back to the raw seconds.
#[must_use]
pub fn format_deadline(deadline: u64) -> String {
    i64::try_from(deadline)
        .ok()
        .and_then(|seconds| DateTime::<Utc>::from_timestamp(seconds, 0))
        .map_or_else(
            || deadline.to_string(),
            |utc| utc.with_timezone(&Local).format("%x").to_string(),
        )
}
