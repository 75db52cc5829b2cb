//! Rolling 24-hour sleep total against the age-indexed recommendation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{InsightConfig, RecommendedRange};
use crate::event::SleepEvent;

/// How the last 24 hours of sleep compare to the recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepBudget {
    pub total_minutes_last_24h: i64,
    pub recommended: RecommendedRange,
    pub below_recommended: bool,
    /// Routine hint for the child's age band.
    pub advice: String,
}

impl SleepBudget {
    #[allow(clippy::cast_precision_loss)]
    pub fn total_hours(&self) -> f64 {
        self.total_minutes_last_24h as f64 / 60.0
    }

    /// Total as a rounded percentage of the recommended maximum.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent_of_max(&self) -> u32 {
        if self.recommended.max_hours == 0 {
            return 0;
        }
        (self.total_hours() / f64::from(self.recommended.max_hours) * 100.0)
            .round()
            .max(0.0) as u32
    }
}

/// Evaluates the sleep budget at `now`.
///
/// A session counts when its end time is within the last 24 hours, and it
/// counts in full (by its duration) even if it started before the window.
pub fn evaluate(
    sleeps: &[SleepEvent],
    age_months: u32,
    config: &InsightConfig,
    now: DateTime<Utc>,
) -> SleepBudget {
    let since = now - Duration::hours(24);
    let total_minutes_last_24h: i64 = sleeps
        .iter()
        .filter(|s| s.end_time >= since)
        .map(|s| s.duration_minutes)
        .sum();

    let band = config.age_band(age_months);
    let recommended = band.map(|b| b.range).unwrap_or_default();
    let advice = band.map(|b| b.advice.clone()).unwrap_or_default();

    // Compare in minutes to stay exact: hours < min  <=>  minutes < min * 60.
    let below_recommended = total_minutes_last_24h < i64::from(recommended.min_hours) * 60;

    tracing::debug!(
        total_minutes_last_24h,
        age_months,
        min_hours = recommended.min_hours,
        below_recommended,
        "evaluated sleep budget"
    );

    SleepBudget {
        total_minutes_last_24h,
        recommended,
        below_recommended,
        advice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventId;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 8, 20, 0, 0).unwrap()
    }

    fn sleep(id: &str, ended_hours_ago: i64, minutes: i64) -> SleepEvent {
        let end = now() - Duration::hours(ended_hours_ago);
        SleepEvent::new(EventId::new(id).unwrap(), end - Duration::minutes(minutes), end).unwrap()
    }

    #[test]
    fn young_baby_with_ten_hours_is_below() {
        let sleeps = vec![sleep("a", 2, 360), sleep("b", 12, 240)];
        let budget = evaluate(&sleeps, 2, &InsightConfig::default(), now());

        assert_eq!(budget.total_minutes_last_24h, 600);
        assert_eq!(budget.recommended, RecommendedRange { min_hours: 14, max_hours: 17 });
        assert!(budget.below_recommended);
        assert!(budget.advice.contains("short cycles"));
    }

    #[test]
    fn toddler_with_twelve_hours_is_fine() {
        let sleeps = vec![sleep("night", 10, 600), sleep("nap", 3, 120)];
        let budget = evaluate(&sleeps, 30, &InsightConfig::default(), now());

        assert_eq!(budget.total_minutes_last_24h, 720);
        assert_eq!(budget.recommended, RecommendedRange { min_hours: 10, max_hours: 13 });
        assert!(!budget.below_recommended);
    }

    #[test]
    fn session_ending_inside_window_counts_in_full() {
        // Ends 23h ago after 5h, so it started 28h ago.
        let sleeps = vec![sleep("straddle", 23, 300), sleep("stale", 25, 600)];
        let budget = evaluate(&sleeps, 6, &InsightConfig::default(), now());
        assert_eq!(budget.total_minutes_last_24h, 300);
    }

    #[test]
    fn window_lower_bound_is_inclusive() {
        let sleeps = vec![sleep("edge", 24, 60)];
        let budget = evaluate(&sleeps, 6, &InsightConfig::default(), now());
        assert_eq!(budget.total_minutes_last_24h, 60);
    }

    #[test]
    fn exactly_minimum_is_not_below() {
        let sleeps = vec![sleep("a", 1, 11 * 60)];
        let budget = evaluate(&sleeps, 12, &InsightConfig::default(), now());
        assert!(!budget.below_recommended);
    }

    #[test]
    fn no_sleep_is_below_and_zero_percent() {
        let budget = evaluate(&[], 0, &InsightConfig::default(), now());
        assert_eq!(budget.total_minutes_last_24h, 0);
        assert!(budget.below_recommended);
        assert_eq!(budget.percent_of_max(), 0);
    }

    #[test]
    fn percent_of_max_rounds() {
        let sleeps = vec![sleep("a", 1, 13 * 60)];
        let budget = evaluate(&sleeps, 12, &InsightConfig::default(), now());
        // 13h of 14h max.
        assert_eq!(budget.percent_of_max(), 93);
        assert!((budget.total_hours() - 13.0).abs() < f64::EPSILON);
    }
}
