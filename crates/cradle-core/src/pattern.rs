//! Feed-to-sleep pattern mining.
//!
//! Looks for the hour of day at which feedings most often precede a long
//! sleep. A feeding counts toward a long sleep when it happened no more than
//! `feed_lookback_minutes` before the sleep started (and strictly before it).
//! The same feeding may count toward more than one long sleep.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::InsightConfig;
use crate::event::{FeedingEvent, SleepEvent};
use crate::window::{self, Window};

/// The feeding hour most associated with long sleeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingPattern {
    /// Hour of day (0-23) in the caller's timezone.
    pub hour: u32,
    /// How many qualifying feedings fell in that hour.
    pub occurrences: u32,
}

/// Finds the most common feeding hour before long sleeps.
///
/// Sleeps are restricted to those starting within the trailing
/// `pattern_window_days`. Hours are bucketed in `now`'s timezone. Ties go to
/// the earliest hour of the day. Returns `None` when there are no long sleeps,
/// no feedings, or no feeding falls inside any lookback window.
pub fn find_pattern<Tz: TimeZone>(
    sleeps: &[SleepEvent],
    feedings: &[FeedingEvent],
    config: &InsightConfig,
    now: &DateTime<Tz>,
) -> Option<FeedingPattern> {
    if feedings.is_empty() {
        return None;
    }

    let now_utc = now.with_timezone(&Utc);
    let long_sleeps: Vec<&SleepEvent> = window::filter(
        sleeps,
        |s| s.start_time,
        Window::LastDays(config.pattern_window_days),
        now_utc,
    )
    .into_iter()
    .filter(|s| s.duration_minutes > config.long_sleep_threshold_minutes)
    .collect();

    if long_sleeps.is_empty() {
        tracing::trace!("no long sleeps in pattern window");
        return None;
    }

    let lookback = Duration::try_minutes(config.feed_lookback_minutes).unwrap_or(Duration::MAX);
    let tz = now.timezone();
    let mut hours: BTreeMap<u32, u32> = BTreeMap::new();

    for sleep in &long_sleeps {
        for feeding in feedings {
            let gap = sleep.start_time - feeding.timestamp;
            if gap > Duration::zero() && gap <= lookback {
                let hour = feeding.timestamp.with_timezone(&tz).hour();
                *hours.entry(hour).or_insert(0) += 1;
            }
        }
    }

    // BTreeMap iterates hours ascending; only a strictly larger count replaces
    // the current best, so the earliest hour wins a tie.
    let mut best: Option<FeedingPattern> = None;
    for (&hour, &occurrences) in &hours {
        if best.is_none_or(|b| occurrences > b.occurrences) {
            best = Some(FeedingPattern { hour, occurrences });
        }
    }

    if let Some(pattern) = best {
        tracing::debug!(
            hour = pattern.hour,
            occurrences = pattern.occurrences,
            long_sleeps = long_sleeps.len(),
            "found feed-to-sleep pattern"
        );
    }
    best
}
