use std::fmt;

use crate::engine::ScheduleError;
use crate::model::ClockTime;

/// Visible window of the day board, in whole hours, and the slot width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub start_hour: u8,
    /// Exclusive.
    pub end_hour: u8,
    pub step_minutes: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start_hour: 6,
            end_hour: 22,
            step_minutes: 30,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.step_minutes == 0 || 60 % self.step_minutes != 0 {
            return Err(ScheduleError::Configuration(format!(
                "slot step of {} minutes does not divide an hour",
                self.step_minutes
            )));
        }
        if self.end_hour <= self.start_hour {
            return Err(ScheduleError::Configuration(format!(
                "grid end hour {} is not after start hour {}",
                self.end_hour, self.start_hour
            )));
        }
        if self.end_hour > 24 {
            return Err(ScheduleError::Configuration(format!(
                "grid end hour {} is past midnight",
                self.end_hour
            )));
        }
        Ok(())
    }
}

/// One column of the day board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub index: usize,
    pub time: ClockTime,
    pub step_minutes: u16,
}

impl TimeSlot {
    pub fn minutes(&self) -> u16 {
        self.time.minutes()
    }

    /// Boundary of the following slot (`slotTime + step`).
    pub fn end_minutes(&self) -> u16 {
        self.time.minutes() + self.step_minutes
    }

    pub fn decimal_hours(&self) -> f64 {
        self.time.decimal_hours()
    }

    pub fn label(&self) -> String {
        self.time.label_12h()
    }

    /// 24h identity key, e.g. `"9:30"`.
    pub fn key(&self) -> String {
        self.time.to_string()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.time.fmt(f)
    }
}

/// Ordered slots covering `[start_hour, end_hour)`.
pub fn build_slots(config: &GridConfig) -> Result<Vec<TimeSlot>, ScheduleError> {
    config.validate()?;
    let first = config.start_hour as u16 * 60;
    let last = config.end_hour as u16 * 60;
    (first..last)
        .step_by(config.step_minutes as usize)
        .enumerate()
        .map(|(index, minutes)| {
            Ok(TimeSlot {
                index,
                time: ClockTime::from_minutes(minutes)?,
                step_minutes: config.step_minutes,
            })
        })
        .collect()
}
