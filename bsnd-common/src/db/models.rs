//! Database models
//!
//! Sound assets are owned by the asset repository. Selection code only ever
//! reads snapshots of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Playback slot a sound asset can fill in a briefing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCategory {
    Intro,
    Background,
    Midtro,
    Outro,
    AdIntro,
    AdOutro,
}

impl SoundCategory {
    /// All categories, in sweep order
    pub const ALL: [SoundCategory; 6] = [
        SoundCategory::Intro,
        SoundCategory::Background,
        SoundCategory::Midtro,
        SoundCategory::Outro,
        SoundCategory::AdIntro,
        SoundCategory::AdOutro,
    ];

    /// Database / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCategory::Intro => "intro",
            SoundCategory::Background => "background",
            SoundCategory::Midtro => "midtro",
            SoundCategory::Outro => "outro",
            SoundCategory::AdIntro => "ad_intro",
            SoundCategory::AdOutro => "ad_outro",
        }
    }
}

impl fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SoundCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown sound category: {}", s)))
    }
}

/// Coarse wall-clock bucket used by time-of-day conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket a 24h wall-clock hour
    ///
    /// - morning: 05:00 to 11:59
    /// - afternoon: 12:00 to 16:59
    /// - evening: 17:00 to 20:59
    /// - night: 21:00 to 04:59
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            "night" => Ok(TimeOfDay::Night),
            other => Err(Error::InvalidInput(format!("Unknown time of day: {}", other))),
        }
    }
}

/// Conditions under which an asset may be selected
///
/// Every axis is optional; `None` means "no restriction on this axis".
/// List axes treat an empty list exactly like `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundConditions {
    /// Inclusive upper bound on briefing duration (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<i64>,

    /// Inclusive lower bound on briefing duration (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration_seconds: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sport_ids: Option<Vec<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub league_ids: Option<Vec<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_ids: Option<Vec<i64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<TimeOfDay>,

    /// Allowed weekdays, 0-6 with Sunday = 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<Vec<u8>>,

    /// Higher wins during ranking
    pub priority: i64,
}

impl SoundConditions {
    /// Conditions that match every context
    pub fn universal() -> Self {
        Self::default()
    }

    /// True when no axis restricts selection (priority is not an axis)
    pub fn is_universal(&self) -> bool {
        self.max_duration_seconds.is_none()
            && self.min_duration_seconds.is_none()
            && restriction(&self.sport_ids).is_none()
            && restriction(&self.league_ids).is_none()
            && restriction(&self.team_ids).is_none()
            && self.time_of_day.is_none()
            && restriction(&self.day_of_week).is_none()
    }
}

/// The effective restriction of a list axis
///
/// Returns `None` for both a missing and an empty list.
pub fn restriction<T>(list: &Option<Vec<T>>) -> Option<&[T]> {
    match list {
        Some(values) if !values.is_empty() => Some(values.as_slice()),
        _ => None,
    }
}

/// A candidate audio clip for one playback category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundAsset {
    pub id: Uuid,
    pub category: SoundCategory,
    /// Opaque pointer to the stored audio blob
    pub file_reference: String,
    pub duration_seconds: Option<f64>,
    pub conditions: SoundConditions,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SoundAsset {
    /// Create an active asset with universal conditions
    pub fn new(category: SoundCategory, file_reference: impl Into<String>) -> Self {
        let now = crate::time::now();
        Self {
            id: Uuid::new_v4(),
            category,
            file_reference: file_reference.into(),
            duration_seconds: None,
            conditions: SoundConditions::universal(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_conditions(mut self, conditions: SoundConditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration_seconds = Some(seconds);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Active and carrying no restrictions
    pub fn is_universal_fallback(&self) -> bool {
        self.is_active && self.conditions.is_universal()
    }
}
