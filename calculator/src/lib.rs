pub mod calculator;
pub mod clock;
pub mod form;
pub mod preset;

pub use calculator::{compute, HeaterClockSetting, DEFAULT_REFERENCE};
pub use clock::{ClockError, ClockTime};
pub use form::{parse_datetime, FormError, HeaterTimerForm};
pub use preset::TimerPreset;
