use crate::clock::ClockTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference times the heater timer ships with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerPreset {
    #[default]
    HalfPastMidnight,
    HalfPastOne,
}

impl TimerPreset {
    pub const ALL: [TimerPreset; 2] = [TimerPreset::HalfPastMidnight, TimerPreset::HalfPastOne];

    pub fn clock_time(self) -> ClockTime {
        match self {
            TimerPreset::HalfPastMidnight => ClockTime::HALF_PAST_MIDNIGHT,
            TimerPreset::HalfPastOne => ClockTime::HALF_PAST_ONE,
        }
    }

    pub fn from_clock_time(t: ClockTime) -> Option<TimerPreset> {
        Self::ALL.into_iter().find(|p| p.clock_time() == t)
    }

    pub fn toggled(self) -> TimerPreset {
        match self {
            TimerPreset::HalfPastMidnight => TimerPreset::HalfPastOne,
            TimerPreset::HalfPastOne => TimerPreset::HalfPastMidnight,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            TimerPreset::HalfPastMidnight => "half-past-midnight",
            TimerPreset::HalfPastOne => "half-past-one",
        }
    }
}

impl fmt::Display for TimerPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(thiserror::Error, Debug)]
#[error("unknown preset {0:?}, expected half-past-midnight or half-past-one")]
pub struct UnknownPreset(String);

impl FromStr for TimerPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.id() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
