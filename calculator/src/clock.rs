use chrono::Timelike;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MINUTES_PER_HOUR: i64 = 60;
pub const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("time of day out of range: {hour}:{minute:02}")]
    OutOfRange { hour: u32, minute: u32 },
    #[error("cannot parse time of day: {0:?}")]
    Unparsable(String),
}

/// A wall-clock time of day with minute precision.
///
/// Stored as minutes past midnight, always in `0..1440`. Dates, seconds and
/// anything finer are dropped on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    pub const MIDNIGHT: ClockTime = ClockTime::at(0, 0);
    pub const HALF_PAST_MIDNIGHT: ClockTime = ClockTime::at(0, 30);
    pub const HALF_PAST_ONE: ClockTime = ClockTime::at(1, 30);
    pub const NOON: ClockTime = ClockTime::at(12, 0);

    const fn at(hour: u16, minute: u16) -> ClockTime {
        ClockTime { minutes: hour * 60 + minute }
    }

    pub fn new(hour: u32, minute: u32) -> Result<ClockTime, ClockError> {
        if hour >= 24 || minute >= 60 {
            return Err(ClockError::OutOfRange { hour, minute });
        }
        Ok(ClockTime { minutes: (hour * 60 + minute) as u16 })
    }

    /// Wraps a signed minute count into a single day: -30 is 23:30, 1440 is
    /// midnight.
    pub fn from_minutes(minutes: i64) -> ClockTime {
        ClockTime { minutes: minutes.rem_euclid(MINUTES_PER_DAY) as u16 }
    }

    pub fn from_time<T: Timelike>(t: &T) -> ClockTime {
        ClockTime { minutes: (t.hour() * 60 + t.minute()) as u16 }
    }

    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    pub fn hour(&self) -> u32 {
        (self.minutes as u32 / 60) % 24
    }

    pub fn minute(&self) -> u32 {
        self.minutes as u32 % 60
    }

    pub fn is_pm(&self) -> bool {
        self.hour() >= 12
    }

    pub fn meridian(&self) -> &'static str {
        if self.is_pm() { "PM" } else { "AM" }
    }

    /// Hour on a 12-hour dial, where hour 0 shows as 12.
    pub fn hour12(&self) -> u32 {
        match self.hour() % 12 {
            0 => 12,
            h => h,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02} {}", self.hour12(), self.minute(), self.meridian())
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    /// Accepts `HH:MM` on a 24-hour clock or `H:MM AM|PM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || ClockError::Unparsable(s.to_string());
        let upper = s.trim().to_ascii_uppercase();

        let (body, pm) = if let Some(rest) = upper.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else if let Some(rest) = upper.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else {
            (upper.as_str(), None)
        };

        let (h, m) = body.split_once(':').ok_or_else(unparsable)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(unparsable());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(unparsable());
        }
        let hour: u32 = h.parse().map_err(|_| unparsable())?;
        let minute: u32 = m.parse().map_err(|_| unparsable())?;

        let hour = match pm {
            None => hour,
            Some(_) if hour == 0 || hour > 12 => {
                return Err(ClockError::OutOfRange { hour, minute });
            }
            Some(pm) => hour % 12 + if pm { 12 } else { 0 },
        };
        ClockTime::new(hour, minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
