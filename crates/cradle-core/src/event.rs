//! Care events logged by caregivers.
//!
//! Records are immutable once created. Collections arrive in whatever order
//! the store keeps them, so every helper here that cares about recency
//! compares timestamps instead of trusting position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::{EventId, ValidationError};

/// Which breast a feeding used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreastSide {
    Left,
    Right,
    Both,
}

impl BreastSide {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

/// How a feeding was given. The payload differs per method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Feeding {
    Breast {
        side: BreastSide,
        duration_minutes: u32,
    },
    Bottle {
        volume_ml: u32,
    },
}

impl Feeding {
    /// Short human label for the method.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Breast { .. } => "Breast",
            Self::Bottle { .. } => "Bottle",
        }
    }
}

/// A single feeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub feeding: Feeding,
}

/// A completed sleep session.
///
/// Built through [`SleepEvent::new`], `end_time > start_time` holds and
/// `duration_minutes` is the rounded length of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepEvent {
    pub id: EventId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
}

impl SleepEvent {
    /// Creates a sleep session, deriving its duration in whole minutes.
    pub fn new(
        id: EventId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if end_time <= start_time {
            return Err(ValidationError::InvalidSleepInterval {
                start: start_time,
                end: end_time,
            });
        }
        let ms = (end_time - start_time).num_milliseconds();
        Ok(Self {
            id,
            start_time,
            end_time,
            duration_minutes: (ms + 30_000) / 60_000,
        })
    }
}

/// What a diaper change contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiaperKind {
    Wet,
    Dirty,
    Both,
}

impl DiaperKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Wet => "Wet",
            Self::Dirty => "Dirty",
            Self::Both => "Wet + dirty",
        }
    }
}

/// A diaper change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaperEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub kind: DiaperKind,
}

/// A weight and height measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Age label captured when the measurement was taken.
    pub age_at_measurement: String,
}

/// Any loggable event, used when appending to a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Record {
    Feeding(FeedingEvent),
    Sleep(SleepEvent),
    Diaper(DiaperEvent),
    Growth(GrowthEvent),
}

impl Record {
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Feeding(_) => Category::Feeding,
            Self::Sleep(_) => Category::Sleep,
            Self::Diaper(_) => Category::Diaper,
            Self::Growth(_) => Category::Growth,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &EventId {
        match self {
            Self::Feeding(e) => &e.id,
            Self::Sleep(e) => &e.id,
            Self::Diaper(e) => &e.id,
            Self::Growth(e) => &e.id,
        }
    }

    /// The instant the record is filed under. Sleeps use their start time.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Feeding(e) => e.timestamp,
            Self::Sleep(e) => e.start_time,
            Self::Diaper(e) => e.timestamp,
            Self::Growth(e) => e.timestamp,
        }
    }
}

/// Most recent feeding by timestamp.
pub fn latest_feeding(feedings: &[FeedingEvent]) -> Option<&FeedingEvent> {
    feedings.iter().max_by_key(|f| f.timestamp)
}

/// Most recent sleep by end time.
pub fn latest_sleep(sleeps: &[SleepEvent]) -> Option<&SleepEvent> {
    sleeps.iter().max_by_key(|s| s.end_time)
}

/// Most recent diaper change by timestamp.
pub fn latest_diaper(diapers: &[DiaperEvent]) -> Option<&DiaperEvent> {
    diapers.iter().max_by_key(|d| d.timestamp)
}
