//! Period reports over a week, a month or an explicit range.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{DiaperKind, Feeding, GrowthEvent};
use crate::store::EventLog;
use crate::window::{self, Window};

/// Feeding totals for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingTotals {
    pub total: usize,
    pub breast: usize,
    pub bottle: usize,
    pub bottle_volume_ml: u64,
    pub breast_minutes: u64,
}

/// Sleep totals for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepTotals {
    pub sessions: usize,
    pub total_minutes: i64,
    /// Rounded mean session length, 0 without sessions.
    pub average_minutes: i64,
}

/// Diaper totals for a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaperTotals {
    pub total: usize,
    pub wet: usize,
    pub dirty: usize,
    pub both: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub feedings: FeedingTotals,
    pub sleep: SleepTotals,
    pub diapers: DiaperTotals,
    /// Most recent measurement inside the period.
    pub latest_growth: Option<GrowthEvent>,
}

impl PeriodReport {
    pub const fn is_empty(&self) -> bool {
        self.feedings.total == 0
            && self.sleep.sessions == 0
            && self.diapers.total == 0
            && self.latest_growth.is_none()
    }
}

/// Builds the report for `window` resolved at `now`.
///
/// Both bounds are inclusive. Sleeps are selected by start time.
pub fn period_report(log: &EventLog, window: Window, now: DateTime<Utc>) -> PeriodReport {
    let (start, end) = window.bounds(now);

    let mut feedings = FeedingTotals::default();
    for f in window::filter(&log.feedings, |f| f.timestamp, window, now) {
        feedings.total += 1;
        match f.feeding {
            Feeding::Breast {
                duration_minutes, ..
            } => {
                feedings.breast += 1;
                feedings.breast_minutes += u64::from(duration_minutes);
            }
            Feeding::Bottle { volume_ml } => {
                feedings.bottle += 1;
                feedings.bottle_volume_ml += u64::from(volume_ml);
            }
        }
    }

    let sleeps = window::filter(&log.sleeps, |s| s.start_time, window, now);
    let total_minutes: i64 = sleeps.iter().map(|s| s.duration_minutes).sum();
    let sessions = sleeps.len();
    let average_minutes = i64::try_from(sessions)
        .ok()
        .filter(|&n| n > 0)
        .map_or(0, |n| (total_minutes + n / 2) / n);

    let mut diapers = DiaperTotals::default();
    for d in window::filter(&log.diapers, |d| d.timestamp, window, now) {
        diapers.total += 1;
        match d.kind {
            DiaperKind::Wet => diapers.wet += 1,
            DiaperKind::Dirty => diapers.dirty += 1,
            DiaperKind::Both => diapers.both += 1,
        }
    }

    let latest_growth = window::filter(&log.growth, |g| g.timestamp, window, now)
        .into_iter()
        .max_by_key(|g| g.timestamp)
        .cloned();

    tracing::debug!(
        %start,
        %end,
        feedings = feedings.total,
        sleeps = sessions,
        diapers = diapers.total,
        "built period report"
    );

    PeriodReport {
        start,
        end,
        feedings,
        sleep: SleepTotals {
            sessions,
            total_minutes,
            average_minutes,
        },
        diapers,
        latest_growth,
    }
}
