//! Business hours: decides whether the final menu offers a human agent.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};

use crate::config::BusinessHoursConfig;

/// Source of the "is the team available" decision.
pub trait BusinessHours: Send + Sync {
    fn is_open(&self, now: DateTime<Utc>) -> bool;
}

/// The team is always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOpen;

impl BusinessHours for AlwaysOpen {
    fn is_open(&self, _now: DateTime<Utc>) -> bool {
        true
    }
}

/// Fixed daily window in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct WeeklySchedule {
    pub offset: FixedOffset,
    /// Inclusive.
    pub open_hour: u32,
    /// Exclusive.
    pub close_hour: u32,
    /// Closed on Saturday and Sunday.
    pub weekdays_only: bool,
}

impl BusinessHours for WeeklySchedule {
    fn is_open(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.offset);
        if self.weekdays_only && matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        (self.open_hour..self.close_hour).contains(&local.hour())
    }
}

/// Build the configured oracle.
pub fn from_config(config: &BusinessHoursConfig) -> Box<dyn BusinessHours> {
    match *config {
        BusinessHoursConfig::Always => Box::new(AlwaysOpen),
        BusinessHoursConfig::Schedule {
            open_hour,
            close_hour,
            utc_offset_minutes,
            weekdays_only,
        } => match FixedOffset::east_opt(utc_offset_minutes * 60) {
            Some(offset) => Box::new(WeeklySchedule {
                offset,
                open_hour,
                close_hour,
                weekdays_only,
            }),
            None => {
                tracing::warn!(utc_offset_minutes, "Invalid business hours offset, treating team as always available");
                Box::new(AlwaysOpen)
            }
        },
    }
}
