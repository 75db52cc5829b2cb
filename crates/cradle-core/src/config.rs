//! Tunable thresholds for the insight engine.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Upper bound for every minute threshold and the reminder interval (30 days).
pub const MAX_THRESHOLD_MINUTES: i64 = 30 * 24 * 60;

/// Upper bound for the trailing pattern and rhythm windows.
pub const MAX_WINDOW_DAYS: u32 = 366;

fn check_range(field: &'static str, value: i64, max: i64) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    if value > max {
        return Err(ValidationError::TooLarge { field, value, max });
    }
    Ok(())
}

/// Recommended total sleep per 24 hours, in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedRange {
    pub min_hours: u32,
    pub max_hours: u32,
}

impl Default for RecommendedRange {
    fn default() -> Self {
        Self {
            min_hours: 14,
            max_hours: 17,
        }
    }
}

/// One row of the age-indexed sleep table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    /// Inclusive upper bound in months. `None` means no upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age_months: Option<u32>,
    pub range: RecommendedRange,
    /// Routine hint shown alongside the sleep budget.
    pub advice: String,
}

impl AgeBand {
    fn new(max_age_months: Option<u32>, min_hours: u32, max_hours: u32, advice: &str) -> Self {
        Self {
            max_age_months,
            range: RecommendedRange {
                min_hours,
                max_hours,
            },
            advice: advice.to_string(),
        }
    }

    const fn covers(&self, age_months: u32) -> bool {
        match self.max_age_months {
            Some(max) => age_months <= max,
            None => true,
        }
    }
}

/// Default age table: 0-3, 4-11, 12-24 and over 24 months.
pub fn default_age_bands() -> Vec<AgeBand> {
    vec![
        AgeBand::new(
            Some(3),
            14,
            17,
            "Newborns sleep in short cycles. Try building a sleep routine right after feedings.",
        ),
        AgeBand::new(
            Some(11),
            12,
            15,
            "Keep regular nap times (morning and afternoon) and start night sleep around 7-8pm.",
        ),
        AgeBand::new(
            Some(24),
            11,
            14,
            "Keep 1-2 daytime naps and a consistent night sleep around 7-8pm.",
        ),
        AgeBand::new(
            None,
            10,
            13,
            "Keep one nap after lunch and a consistent night sleep around 8-9pm.",
        ),
    ]
}

/// Thresholds and fallbacks used across the engine.
///
/// All durations are whole minutes unless the name says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Suggest feeding once this long has passed since the last one,
    /// whether or not a reminder is configured. Default: 240 (4 hours).
    pub feeding_ceiling_minutes: i64,

    /// Suggest sleep once the baby has been awake this long. Default: 120 (2 hours).
    pub awake_ceiling_minutes: i64,

    /// Feeding rhythm used when fewer than two feedings are in scope. Default: 180.
    pub default_feeding_interval_minutes: i64,

    /// Sleep rhythm used when fewer than two sleeps are in scope. Default: 240.
    pub default_sleep_interval_minutes: i64,

    /// Sleeps strictly longer than this anchor pattern mining. Default: 120.
    pub long_sleep_threshold_minutes: i64,

    /// How far before a long sleep a feeding may be to count. Default: 120.
    pub feed_lookback_minutes: i64,

    /// Trailing window for pattern mining. Default: 7 days.
    pub pattern_window_days: u32,

    /// Trailing window for rhythm estimation. Default: 7 days.
    pub rhythm_window_days: u32,

    /// Age-indexed recommended sleep, youngest band first.
    pub age_bands: Vec<AgeBand>,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            feeding_ceiling_minutes: 240,
            awake_ceiling_minutes: 120,
            default_feeding_interval_minutes: 180,
            default_sleep_interval_minutes: 240,
            long_sleep_threshold_minutes: 120,
            feed_lookback_minutes: 120,
            pattern_window_days: 7,
            rhythm_window_days: 7,
            age_bands: default_age_bands(),
        }
    }
}

impl InsightConfig {
    /// Checks the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let minutes = [
            ("feeding_ceiling_minutes", self.feeding_ceiling_minutes),
            ("awake_ceiling_minutes", self.awake_ceiling_minutes),
            (
                "default_feeding_interval_minutes",
                self.default_feeding_interval_minutes,
            ),
            (
                "default_sleep_interval_minutes",
                self.default_sleep_interval_minutes,
            ),
            (
                "long_sleep_threshold_minutes",
                self.long_sleep_threshold_minutes,
            ),
            ("feed_lookback_minutes", self.feed_lookback_minutes),
        ];
        for (field, value) in minutes {
            check_range(field, value, MAX_THRESHOLD_MINUTES)?;
        }
        let days = [
            ("pattern_window_days", self.pattern_window_days),
            ("rhythm_window_days", self.rhythm_window_days),
        ];
        for (field, value) in days {
            check_range(field, i64::from(value), i64::from(MAX_WINDOW_DAYS))?;
        }

        let Some((last, rest)) = self.age_bands.split_last() else {
            return Err(ValidationError::EmptyAgeBands);
        };
        let mut previous: Option<u32> = None;
        for band in rest {
            let Some(max) = band.max_age_months else {
                return Err(ValidationError::UnorderedAgeBands);
            };
            if previous.is_some_and(|p| max <= p) {
                return Err(ValidationError::UnorderedAgeBands);
            }
            previous = Some(max);
        }
        if let (Some(max), Some(p)) = (last.max_age_months, previous) {
            if max <= p {
                return Err(ValidationError::UnorderedAgeBands);
            }
        }
        Ok(())
    }

    /// The first band whose upper bound covers `age_months`.
    ///
    /// Ages past a fully bounded table fall into the last band.
    pub fn age_band(&self, age_months: u32) -> Option<&AgeBand> {
        self.age_bands
            .iter()
            .find(|band| band.covers(age_months))
            .or_else(|| self.age_bands.last())
    }
}

/// User-configured feeding reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub interval_minutes: i64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_minutes: 180,
        }
    }
}

impl ReminderConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("interval_minutes", self.interval_minutes, MAX_THRESHOLD_MINUTES)
    }

    /// When the next feeding is due, if the reminder is on.
    ///
    /// An interval that cannot be added to `last_feeding` yields `None`.
    pub fn due_at(&self, last_feeding: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if !self.enabled {
            return None;
        }
        Duration::try_minutes(self.interval_minutes)
            .and_then(|interval| last_feeding.checked_add_signed(interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(InsightConfig::default().validate(), Ok(()));
    }

    #[test]
    fn age_band_boundaries_are_inclusive() {
        let config = InsightConfig::default();
        let range = |age| config.age_band(age).unwrap().range;

        assert_eq!(range(0).min_hours, 14);
        assert_eq!(range(3).min_hours, 14);
        assert_eq!(range(4).min_hours, 12);
        assert_eq!(range(11).min_hours, 12);
        assert_eq!(range(12).min_hours, 11);
        assert_eq!(range(24).min_hours, 11);
        assert_eq!(range(25).min_hours, 10);
        assert_eq!(range(60).max_hours, 13);
    }

    #[test]
    fn bounded_table_falls_back_to_last_band() {
        let config = InsightConfig {
            age_bands: vec![AgeBand::new(Some(6), 13, 16, "short table")],
            ..InsightConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.age_band(30).unwrap().range.min_hours, 13);
    }

    #[test]
    fn validate_rejects_empty_bands() {
        let config = InsightConfig {
            age_bands: Vec::new(),
            ..InsightConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyAgeBands));
        assert!(config.age_band(2).is_none());
    }

    #[test]
    fn validate_rejects_unordered_bands() {
        let mut bands = default_age_bands();
        bands.swap(0, 1);
        let config = InsightConfig {
            age_bands: bands,
            ..InsightConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::UnorderedAgeBands));

        let config = InsightConfig {
            age_bands: vec![
                AgeBand::new(None, 14, 17, "open"),
                AgeBand::new(Some(12), 12, 15, "bounded"),
            ],
            ..InsightConfig::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::UnorderedAgeBands));
    }

    #[test]
    fn validate_rejects_zero_thresholds() {
        let config = InsightConfig {
            feed_lookback_minutes: 0,
            ..InsightConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::NonPositive {
                field: "feed_lookback_minutes",
                value: 0
            })
        );
    }

    #[test]
    fn validate_rejects_oversized_thresholds() {
        let config = InsightConfig {
            feeding_ceiling_minutes: i64::MAX,
            ..InsightConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::TooLarge {
                field: "feeding_ceiling_minutes",
                value: i64::MAX,
                max: MAX_THRESHOLD_MINUTES,
            })
        );

        let config = InsightConfig {
            pattern_window_days: u32::MAX,
            ..InsightConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::TooLarge {
                field: "pattern_window_days",
                ..
            })
        ));

        let config = InsightConfig {
            awake_ceiling_minutes: MAX_THRESHOLD_MINUTES,
            rhythm_window_days: MAX_WINDOW_DAYS,
            ..InsightConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn partial_toml_style_input_keeps_defaults() {
        let config: InsightConfig =
            serde_json::from_str(r#"{"awake_ceiling_minutes": 90}"#).unwrap();
        assert_eq!(config.awake_ceiling_minutes, 90);
        assert_eq!(config.feeding_ceiling_minutes, 240);
        assert_eq!(config.age_bands.len(), 4);
    }

    #[test]
    fn reminder_defaults_to_disabled_three_hours() {
        let reminder = ReminderConfig::default();
        assert!(!reminder.enabled);
        assert_eq!(reminder.interval_minutes, 180);
    }

    #[test]
    fn reminder_interval_is_bounded() {
        let mut reminder = ReminderConfig {
            enabled: true,
            interval_minutes: MAX_THRESHOLD_MINUTES,
        };
        assert_eq!(reminder.validate(), Ok(()));

        reminder.interval_minutes = i64::MAX;
        assert!(matches!(
            reminder.validate(),
            Err(ValidationError::TooLarge { .. })
        ));
        reminder.interval_minutes = 0;
        assert!(matches!(
            reminder.validate(),
            Err(ValidationError::NonPositive { .. })
        ));
    }

    #[test]
    fn reminder_due_at() {
        let fed = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
        let mut reminder = ReminderConfig {
            enabled: true,
            interval_minutes: 150,
        };
        assert_eq!(
            reminder.due_at(fed),
            Some(Utc.with_ymd_and_hms(2025, 2, 1, 10, 30, 0).unwrap())
        );

        reminder.interval_minutes = i64::MAX;
        assert_eq!(reminder.due_at(fed), None);

        reminder.enabled = false;
        reminder.interval_minutes = 150;
        assert_eq!(reminder.due_at(fed), None);
    }
}
