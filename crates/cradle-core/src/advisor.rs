//! Next-action suggestion for the dashboard.
//!
//! The advisor is a priority chain: the first rule that fires wins.
//!
//! 1. Nothing logged yet: ask for a first activity (targets feeding).
//! 2. Feeding reminder enabled and due: feed.
//! 3. Last feeding older than the feeding ceiling: feed, reminder or not.
//! 4. Awake longer than the awake ceiling, with no sleep in progress: sleep.
//! 5. Otherwise all caught up.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::config::{InsightConfig, ReminderConfig};
use crate::event::{DiaperEvent, FeedingEvent, SleepEvent, latest_diaper, latest_feeding, latest_sleep};

/// What the caregiver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    LogFirstActivity,
    Feed,
    Sleep,
    AllCaughtUp,
}

impl Action {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LogFirstActivity => "Log the first activity",
            Self::Feed => "Time to feed",
            Self::Sleep => "Time to sleep",
            Self::AllCaughtUp => "All caught up!",
        }
    }
}

/// Which rule produced the suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    NoHistory,
    ReminderDue,
    FeedingCeiling,
    AwakeCeiling,
    Nothing,
}

/// A suggested next action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAction {
    pub action: Action,
    /// The category the caregiver would log, if any.
    pub target: Option<Category>,
    pub trigger: Trigger,
}

impl NextAction {
    const fn new(action: Action, target: Option<Category>, trigger: Trigger) -> Self {
        Self {
            action,
            target,
            trigger,
        }
    }
}

/// The slice of history the advisor looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdvisorState {
    pub last_feeding_at: Option<DateTime<Utc>>,
    /// End time of the most recent sleep.
    pub last_wake_at: Option<DateTime<Utc>>,
    pub last_diaper_at: Option<DateTime<Utc>>,
    /// Start of a sleep being tracked live, not yet logged.
    pub asleep_since: Option<DateTime<Utc>>,
    pub reminder: ReminderConfig,
}

impl AdvisorState {
    /// Picks the most recent event of each kind, regardless of input order.
    pub fn from_events(
        feedings: &[FeedingEvent],
        sleeps: &[SleepEvent],
        diapers: &[DiaperEvent],
        reminder: ReminderConfig,
    ) -> Self {
        Self {
            last_feeding_at: latest_feeding(feedings).map(|f| f.timestamp),
            last_wake_at: latest_sleep(sleeps).map(|s| s.end_time),
            last_diaper_at: latest_diaper(diapers).map(|d| d.timestamp),
            asleep_since: None,
            reminder,
        }
    }

    const fn is_empty(&self) -> bool {
        self.last_feeding_at.is_none()
            && self.last_wake_at.is_none()
            && self.last_diaper_at.is_none()
            && self.asleep_since.is_none()
    }
}

/// Whether more than `minutes` separate `since` from `now`.
fn exceeds(since: DateTime<Utc>, now: DateTime<Utc>, minutes: i64) -> bool {
    Duration::try_minutes(minutes).is_some_and(|limit| now - since > limit)
}

/// Evaluates the priority chain at `now`.
pub fn next_action(state: &AdvisorState, config: &InsightConfig, now: DateTime<Utc>) -> NextAction {
    if state.is_empty() {
        return NextAction::new(
            Action::LogFirstActivity,
            Some(Category::Feeding),
            Trigger::NoHistory,
        );
    }

    if let Some(fed_at) = state.last_feeding_at {
        if state.reminder.due_at(fed_at).is_some_and(|due| now >= due) {
            return NextAction::new(Action::Feed, Some(Category::Feeding), Trigger::ReminderDue);
        }
        if exceeds(fed_at, now, config.feeding_ceiling_minutes) {
            return NextAction::new(
                Action::Feed,
                Some(Category::Feeding),
                Trigger::FeedingCeiling,
            );
        }
    }

    if let (Some(woke_at), None) = (state.last_wake_at, state.asleep_since) {
        if exceeds(woke_at, now, config.awake_ceiling_minutes) {
            return NextAction::new(Action::Sleep, Some(Category::Sleep), Trigger::AwakeCeiling);
        }
    }

    NextAction::new(Action::AllCaughtUp, None, Trigger::Nothing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 15, 0, 0).unwrap()
    }

    fn hours_ago(h: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::hours(h))
    }

    fn minutes_ago(m: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::minutes(m))
    }

    fn advise(state: AdvisorState) -> NextAction {
        next_action(&state, &InsightConfig::default(), now())
    }

    #[test]
    fn no_history_asks_for_first_activity() {
        let action = advise(AdvisorState::default());
        assert_eq!(action.action, Action::LogFirstActivity);
        assert_eq!(action.target, Some(Category::Feeding));
        assert_eq!(action.trigger, Trigger::NoHistory);
    }

    #[test]
    fn ceiling_fires_without_a_reminder() {
        let action = advise(AdvisorState {
            last_feeding_at: hours_ago(5),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::Feed);
        assert_eq!(action.target, Some(Category::Feeding));
        assert_eq!(action.trigger, Trigger::FeedingCeiling);
    }

    #[test]
    fn ceiling_is_strictly_greater_than() {
        let action = advise(AdvisorState {
            last_feeding_at: hours_ago(4),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::AllCaughtUp);
    }

    #[test]
    fn reminder_fires_at_exact_interval() {
        let action = advise(AdvisorState {
            last_feeding_at: minutes_ago(90),
            reminder: ReminderConfig {
                enabled: true,
                interval_minutes: 90,
            },
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::Feed);
        assert_eq!(action.trigger, Trigger::ReminderDue);
    }

    #[test]
    fn disabled_reminder_is_ignored() {
        let action = advise(AdvisorState {
            last_feeding_at: minutes_ago(90),
            reminder: ReminderConfig {
                enabled: false,
                interval_minutes: 60,
            },
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::AllCaughtUp);
    }

    #[test]
    fn feeding_outranks_sleep() {
        let action = advise(AdvisorState {
            last_feeding_at: hours_ago(6),
            last_wake_at: hours_ago(3),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::Feed);
    }

    #[test]
    fn long_awake_suggests_sleep() {
        let action = advise(AdvisorState {
            last_feeding_at: hours_ago(1),
            last_wake_at: minutes_ago(121),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::Sleep);
        assert_eq!(action.target, Some(Category::Sleep));
        assert_eq!(action.trigger, Trigger::AwakeCeiling);
    }

    #[test]
    fn awake_ceiling_is_strictly_greater_than() {
        let action = advise(AdvisorState {
            last_feeding_at: hours_ago(1),
            last_wake_at: minutes_ago(120),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::AllCaughtUp);
    }

    #[test]
    fn sleep_in_progress_suppresses_awake_ceiling() {
        let action = advise(AdvisorState {
            last_feeding_at: hours_ago(1),
            last_wake_at: hours_ago(5),
            asleep_since: minutes_ago(30),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::AllCaughtUp);

        let action = advise(AdvisorState {
            asleep_since: minutes_ago(30),
            ..AdvisorState::default()
        });
        assert_eq!(action.trigger, Trigger::Nothing);
    }

    #[test]
    fn huge_thresholds_never_fire() {
        let state = AdvisorState {
            last_feeding_at: Some(now()),
            last_wake_at: hours_ago(10),
            reminder: ReminderConfig {
                enabled: true,
                interval_minutes: i64::MAX,
            },
            ..AdvisorState::default()
        };
        let config = InsightConfig {
            feeding_ceiling_minutes: i64::MAX,
            awake_ceiling_minutes: i64::MAX,
            ..InsightConfig::default()
        };
        assert_eq!(next_action(&state, &config, now()).action, Action::AllCaughtUp);
    }

    #[test]
    fn only_diapers_is_all_caught_up() {
        let action = advise(AdvisorState {
            last_diaper_at: hours_ago(10),
            ..AdvisorState::default()
        });
        assert_eq!(action.action, Action::AllCaughtUp);
        assert_eq!(action.target, None);
    }

    #[test]
    fn configured_ceilings_are_respected() {
        let config = InsightConfig {
            feeding_ceiling_minutes: 60,
            ..InsightConfig::default()
        };
        let state = AdvisorState {
            last_feeding_at: minutes_ago(61),
            ..AdvisorState::default()
        };
        assert_eq!(next_action(&state, &config, now()).action, Action::Feed);
    }

    #[test]
    fn state_from_unsorted_events() {
        use crate::event::{DiaperKind, Feeding};
        use crate::types::EventId;

        let feedings = vec![
            FeedingEvent {
                id: EventId::new("a").unwrap(),
                timestamp: now() - Duration::hours(5),
                feeding: Feeding::Bottle { volume_ml: 100 },
            },
            FeedingEvent {
                id: EventId::new("b").unwrap(),
                timestamp: now() - Duration::hours(1),
                feeding: Feeding::Bottle { volume_ml: 100 },
            },
        ];
        let diapers = vec![DiaperEvent {
            id: EventId::new("d").unwrap(),
            timestamp: now() - Duration::hours(2),
            kind: DiaperKind::Wet,
        }];
        let state = AdvisorState::from_events(&feedings, &[], &diapers, ReminderConfig::default());

        assert_eq!(state.last_feeding_at, hours_ago(1));
        assert_eq!(state.last_wake_at, None);
        assert_eq!(state.last_diaper_at, hours_ago(2));
        assert_eq!(advise(state).action, Action::AllCaughtUp);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let state = AdvisorState {
            last_feeding_at: hours_ago(5),
            ..AdvisorState::default()
        };
        assert_eq!(advise(state), advise(state));
    }
}
