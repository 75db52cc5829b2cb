//! Rhythm estimation from the spacing of same-type events.

use chrono::{DateTime, Utc};

use crate::config::InsightConfig;
use crate::event::{FeedingEvent, SleepEvent};
use crate::window::{self, Window};

/// Average gap in minutes between consecutive instants.
///
/// The instants are sorted newest first and the gaps `t[i] - t[i + 1]` are
/// averaged and rounded. Duplicate instants contribute a zero gap. With fewer
/// than two instants `fallback_minutes` is returned.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn average_interval_minutes<I>(times: I, fallback_minutes: i64) -> i64
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut times: Vec<DateTime<Utc>> = times.into_iter().collect();
    if times.len() < 2 {
        return fallback_minutes;
    }
    times.sort_unstable_by(|a, b| b.cmp(a));

    let total_ms: i64 = times
        .windows(2)
        .map(|pair| (pair[0] - pair[1]).num_milliseconds())
        .sum();
    let gaps = times.len() - 1;

    (total_ms as f64 / 60_000.0 / gaps as f64).round() as i64
}

/// Typical minutes between feedings over the trailing rhythm window.
pub fn feeding_rhythm(
    feedings: &[FeedingEvent],
    config: &InsightConfig,
    now: DateTime<Utc>,
) -> i64 {
    let recent = window::filter(
        feedings,
        |f| f.timestamp,
        Window::LastDays(config.rhythm_window_days),
        now,
    );
    let minutes = average_interval_minutes(
        recent.iter().map(|f| f.timestamp),
        config.default_feeding_interval_minutes,
    );
    tracing::trace!(samples = recent.len(), minutes, "feeding rhythm");
    minutes
}

/// Typical minutes between sleep starts over the trailing rhythm window.
pub fn sleep_rhythm(sleeps: &[SleepEvent], config: &InsightConfig, now: DateTime<Utc>) -> i64 {
    let recent = window::filter(
        sleeps,
        |s| s.start_time,
        Window::LastDays(config.rhythm_window_days),
        now,
    );
    let minutes = average_interval_minutes(
        recent.iter().map(|s| s.start_time),
        config.default_sleep_interval_minutes,
    );
    tracing::trace!(samples = recent.len(), minutes, "sleep rhythm");
    minutes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Feeding;
    use crate::types::EventId;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 2, h, m, 0).unwrap()
    }

    fn feeding(id: &str, t: DateTime<Utc>) -> FeedingEvent {
        FeedingEvent {
            id: EventId::new(id).unwrap(),
            timestamp: t,
            feeding: Feeding::Breast {
                side: crate::event::BreastSide::Left,
                duration_minutes: 10,
            },
        }
    }

    #[test]
    fn single_record_returns_fallback() {
        assert_eq!(average_interval_minutes([at(10, 0)], 180), 180);
        assert_eq!(average_interval_minutes(Vec::new(), 240), 240);
    }

    #[test]
    fn two_records_three_hours_apart() {
        assert_eq!(average_interval_minutes([at(13, 0), at(10, 0)], 999), 180);
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let times = [at(10, 0), at(16, 0), at(13, 0), at(11, 0)];
        // Newest first: 16:00, 13:00, 11:00, 10:00 -> gaps 180, 120, 60.
        assert_eq!(average_interval_minutes(times, 0), 120);
    }

    #[test]
    fn duplicate_timestamps_count_as_zero_gaps() {
        let times = [at(12, 0), at(12, 0), at(9, 0)];
        // Gaps 0 and 180 -> 90.
        assert_eq!(average_interval_minutes(times, 0), 90);
    }

    #[test]
    fn average_is_rounded_to_whole_minutes() {
        let times = [at(10, 0), at(10, 1), at(10, 2) + Duration::seconds(1)];
        // Gaps 61s and 60s -> 60.5s avg -> 1.008 minutes -> 1.
        assert_eq!(average_interval_minutes(times, 0), 1);

        let times = [at(10, 0), at(10, 1) + Duration::seconds(30)];
        // 1.5 minutes rounds up.
        assert_eq!(average_interval_minutes(times, 0), 2);
    }

    #[test]
    fn feeding_rhythm_ignores_feedings_outside_window() {
        let config = InsightConfig::default();
        let now = at(18, 0);
        let feedings = vec![
            feeding("f1", at(15, 0)),
            feeding("f2", at(12, 30)),
            feeding("old", at(12, 0) - Duration::days(8)),
        ];
        assert_eq!(feeding_rhythm(&feedings, &config, now), 150);
    }

    #[test]
    fn rhythms_fall_back_when_history_is_thin() {
        let config = InsightConfig::default();
        let now = at(18, 0);
        assert_eq!(feeding_rhythm(&[feeding("f1", at(15, 0))], &config, now), 180);
        assert_eq!(sleep_rhythm(&[], &config, now), 240);
    }

    #[test]
    fn sleep_rhythm_uses_start_times() {
        let config = InsightConfig::default();
        let now = at(23, 0);
        let sleeps = vec![
            SleepEvent::new(EventId::new("s1").unwrap(), at(9, 0), at(10, 0)).unwrap(),
            SleepEvent::new(EventId::new("s2").unwrap(), at(13, 0), at(15, 30)).unwrap(),
            SleepEvent::new(EventId::new("s3").unwrap(), at(19, 0), at(22, 0)).unwrap(),
        ];
        // Starts 19:00, 13:00, 09:00 -> gaps 360, 240 -> 300.
        assert_eq!(sleep_rhythm(&sleeps, &config, now), 300);
    }
}
