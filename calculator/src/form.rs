use crate::calculator::{compute, HeaterClockSetting, DEFAULT_REFERENCE};
use crate::clock::ClockTime;
use crate::preset::TimerPreset;
use chrono::{Local, NaiveDateTime};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Expected time must be in the future.")]
    PastExpectedTime,
    #[error("Expected start time is not set.")]
    MissingExpectedStart,
    #[error("Invalid date/time {0:?}, expected YYYY-MM-DDTHH:MM")]
    InvalidDateTime(String),
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses the date/time strings a `datetime-local` input or a shell user
/// produces.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, FormError> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| FormError::InvalidDateTime(s.to_string()))
}

/// Rejects an expected start strictly before the current time. Compares the
/// full date and time, so equal values pass.
pub fn validate(current: NaiveDateTime, expected: NaiveDateTime) -> Result<(), FormError> {
    if current > expected {
        debug!("expected start {} is before current time {}", expected, current);
        return Err(FormError::PastExpectedTime);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Pending,
    Ready(HeaterClockSetting),
    Rejected(FormError),
}

/// Inputs of the heater timer form and the setting derived from them.
///
/// Every setter recomputes, so `result()` and `error()` always describe the
/// latest inputs. A rejected input hides any earlier result.
#[derive(Debug, Clone)]
pub struct HeaterTimerForm {
    current_time: NaiveDateTime,
    expected_start: Option<NaiveDateTime>,
    reference: ClockTime,
    outcome: Outcome,
}

impl HeaterTimerForm {
    pub fn new(now: NaiveDateTime) -> Self {
        Self::with_reference(now, DEFAULT_REFERENCE)
    }

    pub fn with_reference(now: NaiveDateTime, reference: ClockTime) -> Self {
        let mut form = HeaterTimerForm {
            current_time: now,
            expected_start: None,
            reference,
            outcome: Outcome::Pending,
        };
        form.recompute();
        form
    }

    /// A form whose current time is the local wall clock.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    pub fn current_time(&self) -> NaiveDateTime {
        self.current_time
    }

    pub fn expected_start(&self) -> Option<NaiveDateTime> {
        self.expected_start
    }

    pub fn reference(&self) -> ClockTime {
        self.reference
    }

    /// The preset matching the current reference, if any.
    pub fn preset(&self) -> Option<TimerPreset> {
        TimerPreset::from_clock_time(self.reference)
    }

    pub fn set_current_time(&mut self, current_time: NaiveDateTime) {
        self.current_time = current_time;
        self.recompute();
    }

    pub fn set_expected_start(&mut self, expected_start: Option<NaiveDateTime>) {
        self.expected_start = expected_start;
        self.recompute();
    }

    pub fn set_reference(&mut self, reference: ClockTime) {
        self.reference = reference;
        self.recompute();
    }

    pub fn select_preset(&mut self, preset: TimerPreset) {
        self.set_reference(preset.clock_time());
    }

    /// Flips between the two presets. A custom reference goes to the default
    /// preset.
    pub fn toggle_preset(&mut self) {
        let next = self.preset().map_or(TimerPreset::default(), TimerPreset::toggled);
        self.select_preset(next);
    }

    /// Whether the manual calculate trigger is enabled.
    pub fn can_calculate(&self) -> bool {
        self.expected_start.is_some()
    }

    /// Manual trigger. Runs the same validation as the reactive path.
    pub fn calculate(&mut self) -> Result<HeaterClockSetting, FormError> {
        self.recompute();
        match &self.outcome {
            Outcome::Ready(setting) => Ok(*setting),
            Outcome::Rejected(err) => Err(err.clone()),
            Outcome::Pending => Err(FormError::MissingExpectedStart),
        }
    }

    pub fn result(&self) -> Option<HeaterClockSetting> {
        match self.outcome {
            Outcome::Ready(setting) => Some(setting),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FormError> {
        match &self.outcome {
            Outcome::Rejected(err) => Some(err),
            _ => None,
        }
    }

    fn recompute(&mut self) {
        self.outcome = match self.expected_start {
            None => Outcome::Pending,
            Some(expected) => match validate(self.current_time, expected) {
                Ok(()) => Outcome::Ready(compute(&self.current_time, &expected, Some(self.reference))),
                Err(err) => Outcome::Rejected(err),
            },
        };
    }
}
