//! Today's chronological activity view, with projected next events.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::event::{DiaperEvent, DiaperKind, Feeding, FeedingEvent, SleepEvent};
use crate::format::format_duration;
use crate::window::is_same_day;

/// What a timeline entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Feeding { feeding: Feeding },
    Sleep { duration_minutes: i64 },
    Diaper { kind: DiaperKind },
    SuggestedFeeding,
    SuggestedSleep,
}

/// A single point on the day's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl TimelineEntry {
    pub const fn category(&self) -> Category {
        match self.kind {
            EntryKind::Feeding { .. } | EntryKind::SuggestedFeeding => Category::Feeding,
            EntryKind::Sleep { .. } | EntryKind::SuggestedSleep => Category::Sleep,
            EntryKind::Diaper { .. } => Category::Diaper,
        }
    }

    pub const fn is_suggestion(&self) -> bool {
        matches!(
            self.kind,
            EntryKind::SuggestedFeeding | EntryKind::SuggestedSleep
        )
    }

    pub fn label(&self) -> String {
        match self.kind {
            EntryKind::Feeding { feeding } => feeding.label().to_string(),
            EntryKind::Sleep { duration_minutes } => {
                format!("Sleep ({})", format_duration(duration_minutes))
            }
            EntryKind::Diaper { kind } => kind.label().to_string(),
            EntryKind::SuggestedFeeding => "Suggested feeding".to_string(),
            EntryKind::SuggestedSleep => "Suggested sleep".to_string(),
        }
    }
}

/// Builds today's timeline in `now`'s timezone.
///
/// Feedings and diapers belong to today by their timestamp; sleeps by their
/// end time, and are placed on the timeline at their start. A feeding
/// suggestion is projected from the latest of today's feedings plus
/// `avg_feeding_interval_minutes`, a sleep suggestion from the latest wake-up
/// today plus `avg_sleep_interval_minutes`; each is kept only if still in the
/// future. The result is sorted by time, stable for equal instants.
pub fn build_today<Tz: TimeZone>(
    feedings: &[FeedingEvent],
    sleeps: &[SleepEvent],
    diapers: &[DiaperEvent],
    avg_feeding_interval_minutes: i64,
    avg_sleep_interval_minutes: i64,
    now: &DateTime<Tz>,
) -> Vec<TimelineEntry> {
    let now_utc = now.with_timezone(&Utc);

    let todays_feedings: Vec<&FeedingEvent> = feedings
        .iter()
        .filter(|f| is_same_day(f.timestamp, now))
        .collect();
    let todays_sleeps: Vec<&SleepEvent> = sleeps
        .iter()
        .filter(|s| is_same_day(s.end_time, now))
        .collect();

    let mut entries: Vec<TimelineEntry> = todays_feedings
        .iter()
        .map(|f| TimelineEntry {
            at: f.timestamp,
            kind: EntryKind::Feeding { feeding: f.feeding },
        })
        .collect();
    entries.extend(todays_sleeps.iter().map(|s| TimelineEntry {
        at: s.start_time,
        kind: EntryKind::Sleep {
            duration_minutes: s.duration_minutes,
        },
    }));
    entries.extend(
        diapers
            .iter()
            .filter(|d| is_same_day(d.timestamp, now))
            .map(|d| TimelineEntry {
                at: d.timestamp,
                kind: EntryKind::Diaper { kind: d.kind },
            }),
    );

    if let Some(last) = todays_feedings.iter().map(|f| f.timestamp).max() {
        let projected = Duration::try_minutes(avg_feeding_interval_minutes)
            .and_then(|interval| last.checked_add_signed(interval));
        if let Some(projected) = projected.filter(|p| *p > now_utc) {
            entries.push(TimelineEntry {
                at: projected,
                kind: EntryKind::SuggestedFeeding,
            });
        }
    }

    if let Some(last_wake) = todays_sleeps.iter().map(|s| s.end_time).max() {
        let projected = Duration::try_minutes(avg_sleep_interval_minutes)
            .and_then(|interval| last_wake.checked_add_signed(interval));
        if let Some(projected) = projected.filter(|p| *p > now_utc) {
            entries.push(TimelineEntry {
                at: projected,
                kind: EntryKind::SuggestedSleep,
            });
        }
    }

    entries.sort_by_key(|e| e.at);
    entries
}
