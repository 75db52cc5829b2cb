//! Dashboard counters: today's totals, diaper usage and growth change.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{DiaperEvent, FeedingEvent, GrowthEvent, SleepEvent};
use crate::window::{self, Window, is_same_day};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Counts for the current calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub feedings: usize,
    pub sleeps: usize,
    pub diapers: usize,
    /// Total minutes of the sleeps that ended today.
    pub sleep_minutes: i64,
}

/// Summarizes today in `now`'s timezone. Sleeps count toward the day they ended.
pub fn summarize_day<Tz: TimeZone>(
    feedings: &[FeedingEvent],
    sleeps: &[SleepEvent],
    diapers: &[DiaperEvent],
    now: &DateTime<Tz>,
) -> DailySummary {
    let todays_sleeps = sleeps.iter().filter(|s| is_same_day(s.end_time, now));
    let (sleep_count, sleep_minutes) =
        todays_sleeps.fold((0, 0), |(n, m), s| (n + 1, m + s.duration_minutes));

    DailySummary {
        feedings: feedings
            .iter()
            .filter(|f| is_same_day(f.timestamp, now))
            .count(),
        sleeps: sleep_count,
        diapers: diapers
            .iter()
            .filter(|d| is_same_day(d.timestamp, now))
            .count(),
        sleep_minutes,
    }
}

/// Diaper usage and cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiaperStats {
    pub today: usize,
    pub last_7_days: usize,
    pub last_30_days: usize,
    /// Cost of the last 30 days of diapers.
    pub monthly_cost: f64,
    /// Diapers per day since the oldest recorded change.
    pub daily_average: f64,
}

/// Computes diaper usage at `now`.
#[allow(clippy::cast_precision_loss)]
pub fn diaper_stats<Tz: TimeZone>(
    diapers: &[DiaperEvent],
    cost_per_diaper: f64,
    now: &DateTime<Tz>,
) -> DiaperStats {
    let now_utc = now.with_timezone(&Utc);
    let time_of = |d: &DiaperEvent| d.timestamp;

    let today = diapers
        .iter()
        .filter(|d| is_same_day(d.timestamp, now))
        .count();
    let last_7_days = window::filter(diapers, time_of, Window::LastDays(7), now_utc).len();
    let last_30_days = window::filter(diapers, time_of, Window::LastDays(30), now_utc).len();

    let daily_average = diapers.iter().map(|d| d.timestamp).min().map_or(0.0, |oldest| {
        let span_ms = (now_utc - oldest).num_milliseconds().max(0);
        let days = ((span_ms + DAY_MS - 1) / DAY_MS).max(1);
        diapers.len() as f64 / days as f64
    });

    DiaperStats {
        today,
        last_7_days,
        last_30_days,
        monthly_cost: last_30_days as f64 * cost_per_diaper,
        daily_average,
    }
}

/// Change between the two most recent growth measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthDelta {
    pub weight_kg: f64,
    pub height_cm: f64,
}

/// Latest measurement minus the one before it, by timestamp.
pub fn growth_delta(growth: &[GrowthEvent]) -> Option<GrowthDelta> {
    let mut sorted: Vec<&GrowthEvent> = growth.iter().collect();
    sorted.sort_by_key(|g| std::cmp::Reverse(g.timestamp));
    match sorted.as_slice() {
        [latest, previous, ..] => Some(GrowthDelta {
            weight_kg: latest.weight_kg - previous.weight_kg,
            height_cm: latest.height_cm - previous.height_cm,
        }),
        _ => None,
    }
}

/// Most recent growth measurement by timestamp.
pub fn latest_growth(growth: &[GrowthEvent]) -> Option<&GrowthEvent> {
    growth.iter().max_by_key(|g| g.timestamp)
}
