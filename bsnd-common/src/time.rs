//! Timestamp and wall-clock utilities

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::db::models::TimeOfDay;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Day of week as 0-6 with Sunday = 0
pub fn day_of_week<T: Datelike>(date: &T) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Time-of-day bucket for a wall-clock time
pub fn time_of_day<T: Timelike>(time: &T) -> TimeOfDay {
    TimeOfDay::from_hour(time.hour())
}
