use crate::clock::{ClockTime, MINUTES_PER_DAY};
use chrono::Timelike;
use serde::Serialize;
use std::fmt;

/// Reference used when the caller does not name one.
pub const DEFAULT_REFERENCE: ClockTime = ClockTime::HALF_PAST_MIDNIGHT;

/// What to set the heater timer's dial to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaterClockSetting {
    /// Minutes from the current time to the expected start, within one day.
    pub offset_minutes: u16,
    pub clock: ClockTime,
}

impl fmt::Display for HeaterClockSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.clock, f)
    }
}

/// Minutes from `current` forward to `desired`, wrapping at midnight. Always
/// in `0..1440`.
pub fn offset_minutes(current: ClockTime, desired: ClockTime) -> u16 {
    let diff = desired.minutes() as i64 - current.minutes() as i64;
    diff.rem_euclid(MINUTES_PER_DAY) as u16
}

/// Winds the timer's reference point back by `offset` minutes.
pub fn heater_clock_setting(reference: ClockTime, offset: u16) -> ClockTime {
    ClockTime::from_minutes(reference.minutes() as i64 - offset as i64)
}

/// Computes the dial setting that makes a timer firing at `reference` start
/// the heater at `desired`, given that it is `current` now.
///
/// Only hour and minute of each input are used. There is no validation: a
/// `desired` earlier than `current` simply wraps to the next day.
pub fn compute<C, D>(current: &C, desired: &D, reference: Option<ClockTime>) -> HeaterClockSetting
where
    C: Timelike,
    D: Timelike,
{
    let reference = reference.unwrap_or(DEFAULT_REFERENCE);
    let offset = offset_minutes(ClockTime::from_time(current), ClockTime::from_time(desired));
    HeaterClockSetting {
        offset_minutes: offset,
        clock: heater_clock_setting(reference, offset),
    }
}
