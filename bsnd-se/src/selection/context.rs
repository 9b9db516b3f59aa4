//! Playback context: the selection query for one briefing

use bsnd_common::time::{day_of_week, time_of_day};
use bsnd_common::TimeOfDay;
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};

use super::SelectionError;

/// What the briefing is about and when it plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackContext {
    /// Estimated or final length of the spoken content
    pub duration_seconds: f64,
    pub sport_id: Option<i64>,
    pub league_id: Option<i64>,
    pub team_id: Option<i64>,
    pub time_of_day: TimeOfDay,
    /// 0-6, Sunday = 0
    pub day_of_week: u8,
}

impl PlaybackContext {
    /// Context for a briefing generated at wall-clock time `at`
    pub fn new<T: Datelike + Timelike>(duration_seconds: f64, at: &T) -> Self {
        Self {
            duration_seconds,
            sport_id: None,
            league_id: None,
            team_id: None,
            time_of_day: time_of_day(at),
            day_of_week: day_of_week(at),
        }
    }

    pub fn with_sport(mut self, sport_id: i64) -> Self {
        self.sport_id = Some(sport_id);
        self
    }

    pub fn with_league(mut self, league_id: i64) -> Self {
        self.league_id = Some(league_id);
        self
    }

    pub fn with_team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_time_of_day(mut self, time_of_day: TimeOfDay) -> Self {
        self.time_of_day = time_of_day;
        self
    }

    pub fn with_day_of_week(mut self, day_of_week: u8) -> Self {
        self.day_of_week = day_of_week;
        self
    }

    /// Reject values no real briefing can produce
    ///
    /// Selection itself never calls this; callers validate before selecting.
    pub fn validate(&self) -> Result<(), SelectionError> {
        if !self.duration_seconds.is_finite() {
            return Err(SelectionError::InvalidContext(format!(
                "duration_seconds must be finite, got {}",
                self.duration_seconds
            )));
        }
        if self.duration_seconds < 0.0 {
            return Err(SelectionError::InvalidContext(format!(
                "duration_seconds must not be negative, got {}",
                self.duration_seconds
            )));
        }
        if self.day_of_week > 6 {
            return Err(SelectionError::InvalidContext(format!(
                "day_of_week must be 0-6, got {}",
                self.day_of_week
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn saturday_evening() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 8)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_new_derives_wall_clock_fields() {
        let context = PlaybackContext::new(60.0, &saturday_evening());

        assert_eq!(context.time_of_day, TimeOfDay::Evening);
        assert_eq!(context.day_of_week, 6);
        assert!(context.sport_id.is_none());
    }

    #[test]
    fn test_builders() {
        let context = PlaybackContext::new(60.0, &saturday_evening())
            .with_sport(1)
            .with_league(10)
            .with_team(100);

        assert_eq!(context.sport_id, Some(1));
        assert_eq!(context.league_id, Some(10));
        assert_eq!(context.team_id, Some(100));
    }

    #[test]
    fn test_validate_accepts_zero_duration() {
        let context = PlaybackContext::new(0.0, &saturday_evening());
        assert!(context.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_duration() {
        let context = PlaybackContext::new(-1.0, &saturday_evening());
        assert!(matches!(
            context.validate(),
            Err(SelectionError::InvalidContext(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nan_duration() {
        let context = PlaybackContext::new(f64::NAN, &saturday_evening());
        assert!(context.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_day_out_of_range() {
        let context = PlaybackContext::new(30.0, &saturday_evening()).with_day_of_week(7);
        let err = context.validate().unwrap_err();
        assert!(err.to_string().contains("day_of_week"));
    }
}
